//! Grammar definition
//!
//!     [`GrammarDefinition`] is the immutable description of the language: editor-assist
//!     configuration (word pattern, bracket / auto-close / surround pairs), the keyword and
//!     operator vocabularies, and the compiled tokenizer states.
//!
//!     The table is data ([`rules`]); [`GrammarDefinition::compile`] turns it into anchored
//!     regexes, resolves `include` groups, and rejects configuration defects (bad
//!     patterns, unknown groups or states, delimiter pairs listed after their own prefix)
//!     before any text is lexed. The built-in definition is compiled once per process and
//!     shared as `&'static`, see [`liquid`].

pub mod action;
pub mod keywords;
pub mod rules;

use crate::liquid::error::GrammarError;
use crate::liquid::lexing::TokenClass;
use action::{Action, RuleDef, RuleSet, StateName, Target, Transition};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Identifier the language is registered under.
pub const LANGUAGE_ID: &str = "liquid";

/// Token boundaries for word-based editor features.
pub const WORD_PATTERN: &str =
    r#"(-?[0-9]*\.[0-9]\w*)|([^`~!@$^&*()=+\[{\]}\\|;:'",.<>/\s]+)"#;

static LIQUID: Lazy<GrammarDefinition> = Lazy::new(|| {
    GrammarDefinition::compile(GrammarSpec::liquid()).expect("built-in liquid grammar compiles")
});

/// The built-in Liquid grammar.
pub fn liquid() -> &'static GrammarDefinition {
    &LIQUID
}

/// An opening/closing delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelimiterPair {
    pub open: &'static str,
    pub close: &'static str,
}

impl DelimiterPair {
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self { open, close }
    }
}

/// Ordered delimiter pairs, most specific first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DelimiterPairs(Vec<DelimiterPair>);

impl DelimiterPairs {
    pub fn as_slice(&self) -> &[DelimiterPair] {
        &self.0
    }

    /// The first pair whose opening delimiter starts `text`. Because longer delimiters
    /// are listed before their prefixes, this is the longest applicable opener.
    pub fn open_at(&self, text: &str) -> Option<&DelimiterPair> {
        self.0.iter().find(|pair| text.starts_with(pair.open))
    }

    /// The first pair whose closing delimiter starts `text`, longest first as above.
    pub fn close_at(&self, text: &str) -> Option<&DelimiterPair> {
        self.0.iter().find(|pair| text.starts_with(pair.close))
    }

    /// Every delimiter must be found by its own lookup. A pair listed after a shorter
    /// prefix of its opener or closer would never be.
    fn validate(&self, list: &'static str) -> Result<(), GrammarError> {
        let shadowed = |longer: &str, shorter: &str| GrammarError::ShadowedDelimiter {
            list,
            longer: longer.to_string(),
            shorter: shorter.to_string(),
        };
        for pair in &self.0 {
            if let Some(first) = self.open_at(pair.open) {
                if first.open != pair.open {
                    return Err(shadowed(pair.open, first.open));
                }
            }
            if let Some(first) = self.close_at(pair.close) {
                if first.close != pair.close {
                    return Err(shadowed(pair.close, first.close));
                }
            }
        }
        Ok(())
    }
}

/// Editor-assist settings handed to the host on registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfiguration {
    pub word_pattern: &'static str,
    pub brackets: DelimiterPairs,
    pub auto_closing_pairs: DelimiterPairs,
    pub surrounding_pairs: DelimiterPairs,
}

/// Uncompiled grammar: everything [`GrammarDefinition::compile`] needs.
#[derive(Debug, Clone)]
pub struct GrammarSpec {
    pub language_id: &'static str,
    pub word_pattern: &'static str,
    pub brackets: Vec<DelimiterPair>,
    pub auto_closing_pairs: Vec<DelimiterPair>,
    pub surrounding_pairs: Vec<DelimiterPair>,
    pub keywords: &'static [&'static str],
    pub operators: &'static [&'static str],
    pub states: Vec<(StateName, RuleSet)>,
    pub groups: Vec<(&'static str, RuleSet)>,
}

impl GrammarSpec {
    pub fn liquid() -> Self {
        Self {
            language_id: LANGUAGE_ID,
            word_pattern: WORD_PATTERN,
            brackets: vec![
                DelimiterPair::new("{{-", "-}}"),
                DelimiterPair::new("{{", "}}"),
                DelimiterPair::new("{%-", "-%}"),
                DelimiterPair::new("{%", "%}"),
                DelimiterPair::new("{", "}"),
                DelimiterPair::new("[", "]"),
                DelimiterPair::new("(", ")"),
            ],
            auto_closing_pairs: vec![
                DelimiterPair::new("{%-", "-%}"),
                DelimiterPair::new("{%", "%}"),
                DelimiterPair::new("{", "}"),
                DelimiterPair::new("[", "]"),
                DelimiterPair::new("(", ")"),
                DelimiterPair::new("\"", "\""),
                DelimiterPair::new("'", "'"),
            ],
            surrounding_pairs: vec![
                DelimiterPair::new("<", ">"),
                DelimiterPair::new("\"", "\""),
                DelimiterPair::new("'", "'"),
            ],
            keywords: keywords::KEYWORDS,
            operators: keywords::OPERATORS,
            states: rules::states(),
            groups: rules::groups(),
        }
    }
}

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub pattern: &'static str,
    /// Matches only at the start of the haystack.
    pub(crate) anchored: Regex,
    /// Unanchored copy, kept for rules that leave an embedded sub-language so the lexer
    /// can find where the embedded text ends.
    pub(crate) search: Option<Regex>,
    pub action: Action,
}

/// Compiled, immutable language definition.
#[derive(Debug)]
pub struct GrammarDefinition {
    language_id: &'static str,
    word_pattern: Regex,
    configuration: LanguageConfiguration,
    keywords: &'static [&'static str],
    keyword_set: HashSet<&'static str>,
    operators: &'static [&'static str],
    operator_set: HashSet<&'static str>,
    states: HashMap<StateName, Vec<CompiledRule>>,
}

impl GrammarDefinition {
    pub fn compile(spec: GrammarSpec) -> Result<Self, GrammarError> {
        let brackets = DelimiterPairs(spec.brackets);
        let auto_closing_pairs = DelimiterPairs(spec.auto_closing_pairs);
        let surrounding_pairs = DelimiterPairs(spec.surrounding_pairs);
        brackets.validate("bracket")?;
        auto_closing_pairs.validate("auto-closing")?;
        surrounding_pairs.validate("surrounding")?;

        let word_pattern =
            Regex::new(spec.word_pattern).map_err(|e| GrammarError::InvalidPattern {
                state: "wordPattern".to_string(),
                pattern: spec.word_pattern.to_string(),
                source: Box::new(e),
            })?;

        let groups: HashMap<&'static str, &RuleSet> =
            spec.groups.iter().map(|(name, set)| (*name, set)).collect();

        let mut states = HashMap::new();
        for (name, set) in &spec.states {
            let mut flat = Vec::new();
            flatten(name.as_str(), set, &groups, &mut Vec::new(), &mut flat)?;
            if flat.is_empty() {
                return Err(GrammarError::EmptyState(name.to_string()));
            }
            let compiled = flat
                .into_iter()
                .map(|(pattern, action)| compile_rule(*name, pattern, action))
                .collect::<Result<Vec<_>, _>>()?;
            states.insert(*name, compiled);
        }

        if !states.contains_key(&StateName::Root) {
            return Err(GrammarError::EmptyState(StateName::Root.to_string()));
        }
        for (name, rules) in &states {
            for rule in rules {
                if let Some(target) = target_state(&rule.action.transition) {
                    if !states.contains_key(&target) {
                        return Err(GrammarError::UndefinedState {
                            from: name.to_string(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            language_id: spec.language_id,
            word_pattern,
            configuration: LanguageConfiguration {
                word_pattern: spec.word_pattern,
                brackets,
                auto_closing_pairs,
                surrounding_pairs,
            },
            keywords: spec.keywords,
            keyword_set: spec.keywords.iter().copied().collect(),
            operators: spec.operators,
            operator_set: spec.operators.iter().copied().collect(),
            states,
        })
    }

    pub fn language_id(&self) -> &'static str {
        self.language_id
    }

    pub fn configuration(&self) -> &LanguageConfiguration {
        &self.configuration
    }

    pub fn brackets(&self) -> &DelimiterPairs {
        &self.configuration.brackets
    }

    /// Keywords in declaration order.
    pub fn keywords(&self) -> &'static [&'static str] {
        self.keywords
    }

    pub fn operators(&self) -> &'static [&'static str] {
        self.operators
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keyword_set.contains(word)
    }

    pub fn is_operator(&self, word: &str) -> bool {
        self.operator_set.contains(word)
    }

    /// Keyword, then operator, then `fallback`.
    pub fn classify(&self, word: &str, fallback: Option<&TokenClass>) -> Option<TokenClass> {
        if self.is_keyword(word) {
            Some(TokenClass::Keyword)
        } else if self.is_operator(word) {
            Some(TokenClass::Operator)
        } else {
            fallback.cloned()
        }
    }

    /// Rules of `state`, in match order. Empty for a state this grammar does not define.
    pub fn rules(&self, state: StateName) -> &[CompiledRule] {
        self.states.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the defined states, sorted.
    pub fn state_names(&self) -> Vec<StateName> {
        let mut names: Vec<_> = self.states.keys().copied().collect();
        names.sort();
        names
    }

    /// Span of the word covering byte `offset` of `line`, if any. An offset just past the
    /// end of a word still belongs to it.
    pub fn word_at(&self, line: &str, offset: usize) -> Option<Range<usize>> {
        self.word_pattern
            .find_iter(line)
            .find(|m| m.start() <= offset && offset <= m.end())
            .map(|m| m.range())
    }
}

fn target_state(transition: &Transition) -> Option<StateName> {
    match transition {
        Transition::Push(target) | Transition::SwitchTo(target) => match target {
            Target::State(name) | Target::Parametrized(name, _) | Target::Template(name) => {
                Some(*name)
            }
            Target::Resume => None,
        },
        Transition::Stay | Transition::Pop => None,
    }
}

fn flatten<'s>(
    owner: &str,
    set: &'s RuleSet,
    groups: &HashMap<&'static str, &'s RuleSet>,
    visiting: &mut Vec<&'static str>,
    out: &mut Vec<(&'static str, Action)>,
) -> Result<(), GrammarError> {
    for def in &set.rules {
        match def {
            RuleDef::Rule { pattern, action } => out.push((*pattern, action.clone())),
            RuleDef::Include(group) => {
                if visiting.contains(group) {
                    return Err(GrammarError::IncludeCycle(group.to_string()));
                }
                let included = groups
                    .get(group)
                    .ok_or_else(|| GrammarError::UnknownInclude {
                        state: owner.to_string(),
                        group: group.to_string(),
                    })?;
                visiting.push(*group);
                flatten(owner, included, groups, visiting, out)?;
                visiting.pop();
            }
        }
    }
    Ok(())
}

fn compile_rule(
    state: StateName,
    pattern: &'static str,
    action: Action,
) -> Result<CompiledRule, GrammarError> {
    let invalid = |e: regex::Error| GrammarError::InvalidPattern {
        state: state.to_string(),
        pattern: pattern.to_string(),
        source: Box::new(e),
    };
    let anchored = Regex::new(&format!("^(?:{})", pattern)).map_err(invalid)?;
    let search = if action.embed == action::Embed::Leave {
        Some(Regex::new(pattern).map_err(invalid)?)
    } else {
        None
    };
    Ok(CompiledRule {
        pattern,
        anchored,
        search,
        action,
    })
}
