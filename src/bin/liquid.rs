//! Command-line interface for the Liquid language definition
//!
//! Usage:
//!   liquid [--config `<file>`] tokenize `<path>` [--format simple|json|yaml] [--states]
//!   liquid [--config `<file>`] completions [--json]
//!   liquid grammar
//!   liquid locale `<id>`

use clap::{Arg, ArgAction, ArgMatches, Command};
use liquid_lang::liquid::completion::provide_completions;
use liquid_lang::liquid::config::{Loader, LiquidConfig};
use liquid_lang::liquid::error::{CliError, FormatError};
use liquid_lang::liquid::formats::{format_lines, OutputFormat};
use liquid_lang::liquid::grammar;
use liquid_lang::liquid::lexing::Lexer;
use liquid_lang::liquid::locale::ui_language_code;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("liquid")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect the Liquid editor language definition")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults (default: ./liquid.toml if present)"),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Print the tokens of a template file")
                .arg(
                    Arg::new("path")
                        .help("Path to the template file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: simple, json or yaml"),
                )
                .arg(
                    Arg::new("states")
                        .long("states")
                        .help("Group tokens per line with the state each line ends in")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Print the keyword completion items")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("grammar")
                .about("Print the language configuration and tokenizer states as JSON"),
        )
        .subcommand(
            Command::new("locale")
                .about("Print the editor UI language code for a platform locale id")
                .arg(Arg::new("id").required(true).index(1)),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config = load_config(matches)?;
    init_logging(&config);

    match matches.subcommand() {
        Some(("tokenize", sub)) => handle_tokenize_command(sub, &config),
        Some(("completions", sub)) => handle_completions_command(sub.get_flag("json")),
        Some(("grammar", _)) => handle_grammar_command(),
        Some(("locale", sub)) => handle_locale_command(sub),
        _ => Ok(()),
    }
}

fn load_config(matches: &ArgMatches) -> Result<LiquidConfig, CliError> {
    let path = matches.get_one::<String>("config").map(Path::new);
    let mut loader = Loader::new().with_user_file(path);
    if let Some(("tokenize", sub)) = matches.subcommand() {
        if let Some(format) = sub.get_one::<String>("format") {
            let format: OutputFormat = format.parse()?;
            loader = loader.output_format(format)?;
        }
        if sub.get_flag("states") {
            loader = loader.show_states()?;
        }
    }
    Ok(loader.build()?)
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(config: &LiquidConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_tokenize_command(sub: &ArgMatches, config: &LiquidConfig) -> Result<(), CliError> {
    let Some(path) = sub.get_one::<String>("path") else {
        return Ok(());
    };
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;

    let lexer = Lexer::new().with_options(config.tokenizer.lexer_options());
    let lines = lexer.tokenize_lines(&source);
    let output = format_lines(
        &source,
        &lines,
        config.output.format,
        config.output.show_states,
    )?;
    print!("{}", output);
    Ok(())
}

fn handle_completions_command(json: bool) -> Result<(), CliError> {
    let items = provide_completions(grammar::liquid().keywords());
    if json {
        let out = serde_json::to_string_pretty(&items)
            .map_err(FormatError::from)?;
        println!("{}", out);
    } else {
        for item in items {
            println!("{}", item.label);
        }
    }
    Ok(())
}

fn handle_grammar_command() -> Result<(), CliError> {
    let grammar = grammar::liquid();
    let summary = serde_json::json!({
        "languageId": grammar.language_id(),
        "configuration": grammar.configuration(),
        "keywords": grammar.keywords(),
        "operators": grammar.operators(),
        "states": grammar.state_names(),
    });
    let out = serde_json::to_string_pretty(&summary)
        .map_err(FormatError::from)?;
    println!("{}", out);
    Ok(())
}

fn handle_locale_command(sub: &ArgMatches) -> Result<(), CliError> {
    let Some(id) = sub.get_one::<String>("id") else {
        return Ok(());
    };
    let locale_id: u32 = id
        .parse()
        .map_err(|_| CliError::InvalidLocale(id.clone()))?;
    println!("{}", ui_language_code(locale_id));
    Ok(())
}
