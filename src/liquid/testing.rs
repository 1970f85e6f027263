//! Testing utilities
//!
//!     Shared by the unit tests and the integration tests under `tests/`.
//!
//!     [`RecordingHost`] is a [`HostEditor`] that remembers every registration call and
//!     keeps what it was given, so a test can register the language and then lex and
//!     complete through the host exactly as the editor would.
//!
//!     [`classes`] flattens a token stream into `(class name, text)` pairs, which makes
//!     expected token streams readable in assertions:
//!
//!         assert_eq!(classes("{{ x }}"), vec![
//!             ("delimiter.liquid".to_string(), "{{"),
//!             ("variable.parameter.liquid".to_string(), "x"),
//!             ("delimiter.liquid".to_string(), "}}"),
//!         ]);

use crate::liquid::completion::{CompletionItem, CompletionSource};
use crate::liquid::grammar::{GrammarDefinition, GrammarSpec, LanguageConfiguration};
use crate::liquid::lexing::{Lexer, Token};
use crate::liquid::registration::HostEditor;
use std::collections::HashMap;

/// One call received by a [`RecordingHost`], with the language id it was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    RegisterLanguage(String),
    SetConfiguration(String),
    SetGrammar(String),
    RegisterCompletions(String),
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    configurations: HashMap<String, LanguageConfiguration>,
    grammars: HashMap<String, &'static GrammarDefinition>,
    completion_sources: HashMap<String, Box<dyn CompletionSource>>,
}

impl RecordingHost {
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// How many times `id` was registered.
    pub fn registrations(&self, id: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HostCall::RegisterLanguage(registered) if registered == id))
            .count()
    }

    pub fn configuration(&self, id: &str) -> Option<&LanguageConfiguration> {
        self.configurations.get(id)
    }

    pub fn grammar(&self, id: &str) -> Option<&'static GrammarDefinition> {
        self.grammars.get(id).copied()
    }

    /// Tokens the host's lexer produces for `text` with the grammar registered for `id`.
    pub fn tokenize(&self, id: &str, text: &str) -> Option<Vec<Token>> {
        self.grammar(id)
            .map(|grammar| Lexer::with_grammar(grammar).tokenize(text))
    }

    /// Items of every registered completion source.
    pub fn completions(&self) -> Vec<CompletionItem> {
        self.completion_sources
            .values()
            .flat_map(|source| source.completions())
            .collect()
    }
}

impl HostEditor for RecordingHost {
    fn register_language_id(&mut self, id: &str) {
        self.calls.push(HostCall::RegisterLanguage(id.to_string()));
    }

    fn set_language_configuration(&mut self, id: &str, configuration: &LanguageConfiguration) {
        self.calls.push(HostCall::SetConfiguration(id.to_string()));
        self.configurations
            .insert(id.to_string(), configuration.clone());
    }

    fn set_tokenizer_grammar(&mut self, id: &str, grammar: &'static GrammarDefinition) {
        self.calls.push(HostCall::SetGrammar(id.to_string()));
        self.grammars.insert(id.to_string(), grammar);
    }

    fn register_completion_source(&mut self, id: &str, source: Box<dyn CompletionSource>) {
        self.calls.push(HostCall::RegisterCompletions(id.to_string()));
        self.completion_sources.insert(id.to_string(), source);
    }
}

/// `(class name, text)` for each token the built-in lexer produces for `text`.
pub fn classes(text: &str) -> Vec<(String, &str)> {
    Lexer::new()
        .tokenize(text)
        .iter()
        .map(|token| (token.class.to_string(), token.text(text)))
        .collect()
}

/// The built-in Liquid table compiled under another language id. Registration is
/// once per id and process, so tests that register use their own id.
pub fn liquid_grammar_as(id: &'static str) -> &'static GrammarDefinition {
    let spec = GrammarSpec {
        language_id: id,
        ..GrammarSpec::liquid()
    };
    let grammar = GrammarDefinition::compile(spec).expect("built-in liquid grammar compiles");
    Box::leak(Box::new(grammar))
}
