//! Token types produced by the lexer
//!
//!     Token classes use the dotted names editor themes understand (`delimiter.html`,
//!     `variable.parameter.liquid`, ...). Spans are byte ranges into the text that was
//!     tokenized: line-relative for [`Lexer::tokenize_line`](super::Lexer::tokenize_line),
//!     document-relative for [`Lexer::tokenize`](super::Lexer::tokenize).

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// Classification of a token span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum TokenClass {
    Keyword,
    Operator,
    /// Bare identifier in markup text.
    Identifier,
    /// Identifier inside a template expression that is neither keyword nor operator.
    Variable,
    Number,
    NumberFloat,
    Delimiter,
    DelimiterHtml,
    DelimiterLiquid,
    TagHtml,
    AttributeName,
    AttributeValue,
    CommentHtml,
    CommentContentHtml,
    /// Quoted literal inside a template expression, kept opaque.
    String,
    /// Text handed to a sub-lexer for an embedded language (`text/javascript`, ...).
    Embedded(std::string::String),
}

impl TokenClass {
    /// Theme name of the class.
    pub fn name(&self) -> std::borrow::Cow<'static, str> {
        use std::borrow::Cow;
        let name = match self {
            TokenClass::Keyword => "keyword",
            TokenClass::Operator => "operator",
            TokenClass::Identifier => "identifier",
            TokenClass::Variable => "variable.parameter.liquid",
            TokenClass::Number => "number",
            TokenClass::NumberFloat => "number.float",
            TokenClass::Delimiter => "delimiter",
            TokenClass::DelimiterHtml => "delimiter.html",
            TokenClass::DelimiterLiquid => "delimiter.liquid",
            TokenClass::TagHtml => "tag.html",
            TokenClass::AttributeName => "attribute.name",
            TokenClass::AttributeValue => "attribute.value",
            TokenClass::CommentHtml => "comment.html",
            TokenClass::CommentContentHtml => "comment.content.html",
            TokenClass::String => "string.liquid",
            TokenClass::Embedded(language) => return Cow::Owned(format!("embedded.{}", language)),
        };
        Cow::Borrowed(name)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for TokenClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl TryFrom<std::string::String> for TokenClass {
    type Error = std::string::String;

    fn try_from(value: std::string::String) -> Result<Self, Self::Error> {
        let class = match value.as_str() {
            "keyword" => TokenClass::Keyword,
            "operator" => TokenClass::Operator,
            "identifier" => TokenClass::Identifier,
            "variable.parameter.liquid" => TokenClass::Variable,
            "number" => TokenClass::Number,
            "number.float" => TokenClass::NumberFloat,
            "delimiter" => TokenClass::Delimiter,
            "delimiter.html" => TokenClass::DelimiterHtml,
            "delimiter.liquid" => TokenClass::DelimiterLiquid,
            "tag.html" => TokenClass::TagHtml,
            "attribute.name" => TokenClass::AttributeName,
            "attribute.value" => TokenClass::AttributeValue,
            "comment.html" => TokenClass::CommentHtml,
            "comment.content.html" => TokenClass::CommentContentHtml,
            "string.liquid" => TokenClass::String,
            other => match other.strip_prefix("embedded.") {
                Some(language) if !language.is_empty() => {
                    TokenClass::Embedded(language.to_string())
                }
                _ => return Err(format!("unknown token class `{}`", other)),
            },
        };
        Ok(class)
    }
}

/// A classified span of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub class: TokenClass,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(class: TokenClass, span: Range<usize>) -> Self {
        Self { class, span }
    }

    /// The slice of `source` this token covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.clone()).unwrap_or("")
    }

    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }
}
