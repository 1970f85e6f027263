//! One-time registration into a host editor
//!
//!     The host editor exposes a registration API ([`HostEditor`]). Registering the
//!     language installs its id, the editor-assist configuration, the tokenizer grammar
//!     and the keyword completion source. A language id may only be registered once per
//!     process: every provider claims its id in one process-wide set before touching the
//!     host, so a repeat call, from the same provider or another one, does nothing and
//!     returns `false`.

use crate::liquid::completion::{CompletionSource, KeywordCompletions};
use crate::liquid::grammar::{self, GrammarDefinition, LanguageConfiguration};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Language ids registered so far in this process. Never shrinks.
static REGISTERED_IDS: Lazy<Mutex<HashSet<&'static str>>> =
    Lazy::new(|| Mutex::new(HashSet::new()));

/// Records `id` as registered. `false` if it already was.
fn claim(id: &'static str) -> bool {
    REGISTERED_IDS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(id)
}

/// Whether `id` has been registered with a host in this process.
pub fn is_registered(id: &str) -> bool {
    REGISTERED_IDS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(id)
}

/// Registration API of the embedding editor.
pub trait HostEditor {
    fn register_language_id(&mut self, id: &str);
    fn set_language_configuration(&mut self, id: &str, configuration: &LanguageConfiguration);
    fn set_tokenizer_grammar(&mut self, id: &str, grammar: &'static GrammarDefinition);
    fn register_completion_source(&mut self, id: &str, source: Box<dyn CompletionSource>);
}

/// Registers one grammar with a host, at most once per language id.
#[derive(Debug, Clone, Copy)]
pub struct LanguageDefinitionProvider {
    grammar: &'static GrammarDefinition,
    completions_enabled: bool,
}

impl LanguageDefinitionProvider {
    pub fn new(grammar: &'static GrammarDefinition) -> Self {
        Self {
            grammar,
            completions_enabled: true,
        }
    }

    /// Skip the completion source on registration.
    pub fn without_completions(mut self) -> Self {
        self.completions_enabled = false;
        self
    }

    pub fn is_registered(&self) -> bool {
        is_registered(self.grammar.language_id())
    }

    /// Installs the language into `host`. Returns `true` for the call that did the
    /// registration of this language id, `false` for every later one.
    pub fn register(&self, host: &mut dyn HostEditor) -> bool {
        let id = self.grammar.language_id();
        if !claim(id) {
            debug!(language = id, "language already registered, skipping");
            return false;
        }

        host.register_language_id(id);
        host.set_language_configuration(id, self.grammar.configuration());
        host.set_tokenizer_grammar(id, self.grammar);
        if self.completions_enabled {
            host.register_completion_source(id, Box::new(KeywordCompletions::new(self.grammar)));
        }
        debug!(
            language = id,
            completions = self.completions_enabled,
            "registered language"
        );
        true
    }
}

/// Registers the built-in Liquid language with `host`, once per process.
pub fn register_language(host: &mut dyn HostEditor) -> bool {
    LanguageDefinitionProvider::new(grammar::liquid()).register(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::testing::{liquid_grammar_as, HostCall, RecordingHost};

    #[test]
    fn test_registration_sequence() {
        let provider = LanguageDefinitionProvider::new(liquid_grammar_as("liquid-sequence"));
        let mut host = RecordingHost::default();

        assert!(!provider.is_registered());
        assert!(provider.register(&mut host));
        let id = "liquid-sequence".to_string();
        assert_eq!(
            host.calls(),
            &[
                HostCall::RegisterLanguage(id.clone()),
                HostCall::SetConfiguration(id.clone()),
                HostCall::SetGrammar(id.clone()),
                HostCall::RegisterCompletions(id),
            ]
        );
        assert!(provider.is_registered());
        assert!(is_registered("liquid-sequence"));
    }

    #[test]
    fn test_second_registration_is_noop() {
        let provider = LanguageDefinitionProvider::new(liquid_grammar_as("liquid-repeat"));
        let mut first = RecordingHost::default();
        let mut second = RecordingHost::default();

        assert!(provider.register(&mut first));
        assert!(!provider.register(&mut second));
        assert!(!provider.register(&mut first));
        assert!(second.calls().is_empty());
        assert_eq!(first.calls().len(), 4);
    }

    #[test]
    fn test_guard_is_keyed_by_language_id() {
        let grammar = liquid_grammar_as("liquid-keyed");
        let mut host = RecordingHost::default();

        assert!(LanguageDefinitionProvider::new(grammar).register(&mut host));
        // a second provider for the same id is refused
        assert!(!LanguageDefinitionProvider::new(grammar).register(&mut host));
        assert_eq!(host.registrations("liquid-keyed"), 1);

        // another id is independent
        let other = LanguageDefinitionProvider::new(liquid_grammar_as("liquid-keyed-other"));
        assert!(other.register(&mut host));
        assert_eq!(host.registrations("liquid-keyed-other"), 1);
    }

    #[test]
    fn test_completions_can_be_disabled() {
        let provider =
            LanguageDefinitionProvider::new(liquid_grammar_as("liquid-no-completions"))
                .without_completions();
        let mut host = RecordingHost::default();
        provider.register(&mut host);
        assert_eq!(host.calls().len(), 3);
        assert!(host.completions().is_empty());
    }
}
