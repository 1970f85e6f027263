//! # liquid-lang
//!
//! Language definition for Liquid templates embedded in HTML, as consumed by an
//! embeddable code editor: the grammar table, the state-machine lexer that runs it,
//! keyword completions and one-time registration into the host editor.
//!
//! ## Testing
//!
//! Shared helpers (a recording host editor, token assertions) live in the
//! [testing module](liquid::testing).

pub mod liquid;

pub use liquid::completion::{provide_completions, CompletionItem, CompletionItemKind};
pub use liquid::grammar::{liquid as liquid_grammar, GrammarDefinition};
pub use liquid::lexing::{Lexer, LexerOptions, LexerState, Token, TokenClass};
pub use liquid::registration::{register_language, HostEditor, LanguageDefinitionProvider};
