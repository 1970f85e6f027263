//! Token stream output formats
//!
//!     The CLI prints token streams in one of three formats:
//!
//!         simple    one token per line: `class start..end "text"`
//!         json      array of `{class, span, text}` records
//!         yaml      the same records as YAML
//!
//!     With `show_states`, records are grouped per source line together with the
//!     lexer state that line ends in.

use crate::liquid::error::FormatError;
use crate::liquid::lexing::{LexerState, LineTokens, Token, TokenClass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Simple,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Simple, OutputFormat::Json, OutputFormat::Yaml];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

/// A token with its source text, as printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord<'a> {
    pub class: &'a TokenClass,
    pub span: Range<usize>,
    pub text: &'a str,
}

impl<'a> TokenRecord<'a> {
    pub fn new(token: &'a Token, source: &'a str) -> Self {
        Self {
            class: &token.class,
            span: token.span.clone(),
            text: token.text(source),
        }
    }
}

#[derive(Debug, Serialize)]
struct LineRecord<'a> {
    line: usize,
    tokens: Vec<TokenRecord<'a>>,
    end_state: &'a LexerState,
}

/// Render the tokens of `lines` (spans relative to `source`).
pub fn format_lines(
    source: &str,
    lines: &[LineTokens],
    format: OutputFormat,
    show_states: bool,
) -> Result<String, FormatError> {
    if show_states {
        let records: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(index, line)| LineRecord {
                line: index + 1,
                tokens: line
                    .tokens
                    .iter()
                    .map(|token| TokenRecord::new(token, source))
                    .collect(),
                end_state: &line.end_state,
            })
            .collect();
        return match format {
            OutputFormat::Simple => Ok(simple_lines(&records)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&records)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(&records)?),
        };
    }

    let records: Vec<_> = lines
        .iter()
        .flat_map(|line| &line.tokens)
        .map(|token| TokenRecord::new(token, source))
        .collect();
    match format {
        OutputFormat::Simple => Ok(simple_tokens(&records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&records)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&records)?),
    }
}

fn simple_tokens(records: &[TokenRecord<'_>]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&simple_token(record));
        out.push('\n');
    }
    out
}

fn simple_lines(records: &[LineRecord<'_>]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!("# line {} -> {}\n", record.line, record.end_state));
        for token in &record.tokens {
            out.push_str("  ");
            out.push_str(&simple_token(token));
            out.push('\n');
        }
    }
    out
}

fn simple_token(record: &TokenRecord<'_>) -> String {
    format!(
        "{} {}..{} {:?}",
        record.class, record.span.start, record.span.end, record.text
    )
}
