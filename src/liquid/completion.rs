//! Keyword completions
//!
//!     The editor asks for completion items whenever the user types in a Liquid buffer.
//!     Every keyword is offered, regardless of the cursor position: filtering by prefix
//!     is left to the editor.

use crate::liquid::grammar::GrammarDefinition;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionItemKind {
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
}

impl CompletionItem {
    pub fn keyword(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: CompletionItemKind::Keyword,
        }
    }
}

/// One keyword item per entry of `keywords`, in order. Repeated entries are offered once.
pub fn provide_completions(keywords: &[&str]) -> Vec<CompletionItem> {
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter(|keyword| seen.insert(**keyword))
        .map(|keyword| CompletionItem::keyword(*keyword))
        .collect()
}

/// Supplier of completion items, as registered with the host editor.
pub trait CompletionSource: Send + Sync {
    fn completions(&self) -> Vec<CompletionItem>;
}

/// Completes the keywords of a grammar.
#[derive(Debug, Clone, Copy)]
pub struct KeywordCompletions {
    grammar: &'static GrammarDefinition,
}

impl KeywordCompletions {
    pub fn new(grammar: &'static GrammarDefinition) -> Self {
        Self { grammar }
    }
}

impl CompletionSource for KeywordCompletions {
    fn completions(&self) -> Vec<CompletionItem> {
        provide_completions(self.grammar.keywords())
    }
}
