//! Error types
//!
//!     Lexing and completion have no error path: unmatched input falls through to a
//!     one-character consume. What remains are configuration defects in a grammar table,
//!     which surface when the table is compiled, and the CLI's own IO/format failures.

use thiserror::Error;

/// Defects found while compiling a grammar table.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid pattern `{pattern}` in state `{state}`: {source}")]
    InvalidPattern {
        state: String,
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("state `{state}` includes unknown rule group `{group}`")]
    UnknownInclude { state: String, group: String },

    #[error("rule group `{0}` includes itself")]
    IncludeCycle(String),

    #[error("state `{0}` has no rules")]
    EmptyState(String),

    #[error("state `{from}` targets undefined state `{target}`")]
    UndefinedState { from: String, target: String },

    #[error("{list} pair `{longer}` is listed after its prefix `{shorter}`")]
    ShadowedDelimiter {
        list: &'static str,
        longer: String,
        shorter: String,
    },
}

/// Errors while rendering a token stream.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown output format `{0}` (expected one of: simple, json, yaml)")]
    UnknownFormat(String),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Top-level error for the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("`{0}` is not a locale id")]
    InvalidLocale(String),
}
