//! Configuration
//!
//!     Settings come from three layers, later ones winning:
//!
//!         defaults/liquid.default.toml    embedded at build time
//!         --config <file>, else ./liquid.toml if present
//!         tokenize flags (--format, --states)
//!
//!     [`Loader::build`] also rejects tokenizer limits the lexer cannot work with.

use crate::liquid::formats::OutputFormat;
use crate::liquid::lexing::LexerOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/liquid.default.toml");

/// Picked up from the working directory when no file is named.
pub const USER_FILE: &str = "liquid.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidConfig {
    pub tokenizer: TokenizerConfig,
    pub completion: CompletionConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Limits of the lexer engine.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    pub max_stack_depth: usize,
    pub max_rematch: usize,
}

impl TokenizerConfig {
    /// A zero rematch budget would refuse the rematch rules that open every `{{` and
    /// `{%`, and a zero stack depth leaves no room for the root frame.
    fn check(&self) -> Result<(), ConfigError> {
        if self.max_stack_depth < 1 {
            return Err(ConfigError::Message(
                "tokenizer.max_stack_depth must be at least 1".to_string(),
            ));
        }
        if self.max_rematch < 1 {
            return Err(ConfigError::Message(
                "tokenizer.max_rematch must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn lexer_options(&self) -> LexerOptions {
        LexerOptions {
            max_stack_depth: self.max_stack_depth,
            max_rematch: self.max_rematch,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    pub enabled: bool,
}

/// How the CLI prints token streams.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_states: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

/// Builds a [`LiquidConfig`] from the layers listed above.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer the user's settings: `path` when given (it must exist), otherwise
    /// [`USER_FILE`] if the working directory has one.
    pub fn with_user_file(self, path: Option<&Path>) -> Self {
        match path {
            Some(path) => self.with_toml(path, true),
            None => self.with_toml(Path::new(USER_FILE), false),
        }
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override("output.format", format.as_str())?;
        Ok(self)
    }

    /// `--states` can only switch state output on.
    pub fn show_states(mut self) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override("output.show_states", true)?;
        Ok(self)
    }

    pub fn build(self) -> Result<LiquidConfig, ConfigError> {
        let config: LiquidConfig = self.builder.build()?.try_deserialize()?;
        config.tokenizer.check()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<LiquidConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn user_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        write!(file, "{}", contents).expect("write config");
        file
    }

    fn load(contents: &str) -> Result<LiquidConfig, ConfigError> {
        let file = user_file(contents);
        Loader::new().with_user_file(Some(file.path())).build()
    }

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.tokenizer.max_stack_depth, 100);
        assert_eq!(config.tokenizer.max_rematch, 8);
        assert!(config.completion.enabled);
        assert_eq!(config.output.format, OutputFormat::Simple);
        assert!(!config.output.show_states);
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.tokenizer.lexer_options(), LexerOptions::default());
    }

    #[test]
    fn flags_override_the_user_file() {
        let file = user_file("[output]\nformat = \"yaml\"\n[tokenizer]\nmax_stack_depth = 12\n");
        let config = Loader::new()
            .with_user_file(Some(file.path()))
            .output_format(OutputFormat::Json)
            .expect("override to apply")
            .show_states()
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.show_states);
        assert_eq!(config.tokenizer.max_stack_depth, 12);
    }

    #[test]
    fn layers_user_file() {
        let config = load("[completion]\nenabled = false\n").expect("config to build");
        assert!(!config.completion.enabled);
        assert_eq!(config.tokenizer.max_rematch, 8);
    }

    #[test]
    fn named_user_file_must_exist() {
        let result = Loader::new()
            .with_user_file(Some(Path::new("/nonexistent/liquid.toml")))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_working_directory_file_is_ignored() {
        assert!(!Path::new(USER_FILE).exists());
        let config = Loader::new()
            .with_user_file(None)
            .build()
            .expect("config to build");
        assert!(config.completion.enabled);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(load("[output]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn rejects_zero_rematch_budget() {
        let err = load("[tokenizer]\nmax_rematch = 0\n").expect_err("zero budget rejected");
        assert!(err.to_string().contains("tokenizer.max_rematch"));
        assert!(load("[tokenizer]\nmax_rematch = 1\n").is_ok());
    }

    #[test]
    fn rejects_zero_stack_depth() {
        let err = load("[tokenizer]\nmax_stack_depth = 0\n").expect_err("zero depth rejected");
        assert!(err.to_string().contains("tokenizer.max_stack_depth"));
    }
}
