//! Embedded sub-language seam
//!
//!     Script and style bodies belong to other languages. The lexer finds where such a
//!     body ends and hands the text in between to a [`SubLexer`]; the host can plug in real
//!     JavaScript/CSS tokenizers there.

use super::tokens::{Token, TokenClass};

/// Tokenizer for text in an embedded language.
pub trait SubLexer {
    /// Tokens for `text`, with spans relative to `text`.
    fn tokenize(&self, language: &str, text: &str) -> Vec<Token>;
}

/// Emits the whole chunk as one `embedded.<language>` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueSubLexer;

impl SubLexer for OpaqueSubLexer {
    fn tokenize(&self, language: &str, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        vec![Token::new(
            TokenClass::Embedded(language.to_string()),
            0..text.len(),
        )]
    }
}

impl<F> SubLexer for F
where
    F: Fn(&str, &str) -> Vec<Token>,
{
    fn tokenize(&self, language: &str, text: &str) -> Vec<Token> {
        self(language, text)
    }
}
