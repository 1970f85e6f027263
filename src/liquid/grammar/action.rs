//! Declarative rule model
//!
//!     A tokenizer state is an ordered list of rules; the first rule whose pattern
//!     matches at the current position wins. A rule's [`Action`] says three things:
//!     what to emit ([`TokenSpec`]), where the state stack goes ([`Transition`]), and
//!     whether an embedded sub-language starts or stops ([`Embed`]).
//!
//!     States that carry a parameter are expressed as stack frames, not as dotted names:
//!     [`Target::Parametrized`] attaches a sub-language to a state, [`Target::Template`]
//!     enters a template-expression state that remembers the frame it came from, and
//!     [`Target::Resume`] goes back to that remembered frame.

use crate::liquid::lexing::TokenClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Names of the tokenizer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateName {
    Root,
    Comment,
    Script,
    ScriptAfterType,
    ScriptAfterTypeEquals,
    ScriptWithCustomType,
    ScriptEmbedded,
    Style,
    StyleAfterType,
    StyleAfterTypeEquals,
    StyleWithCustomType,
    StyleEmbedded,
    LiquidInHtmlAttribute,
    LiquidInHtmlAttributeEmbedded,
    LiquidInSimpleState,
    LiquidInEmbeddedState,
}

impl StateName {
    pub const ALL: [StateName; 16] = [
        StateName::Root,
        StateName::Comment,
        StateName::Script,
        StateName::ScriptAfterType,
        StateName::ScriptAfterTypeEquals,
        StateName::ScriptWithCustomType,
        StateName::ScriptEmbedded,
        StateName::Style,
        StateName::StyleAfterType,
        StateName::StyleAfterTypeEquals,
        StateName::StyleWithCustomType,
        StateName::StyleEmbedded,
        StateName::LiquidInHtmlAttribute,
        StateName::LiquidInHtmlAttributeEmbedded,
        StateName::LiquidInSimpleState,
        StateName::LiquidInEmbeddedState,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StateName::Root => "root",
            StateName::Comment => "comment",
            StateName::Script => "script",
            StateName::ScriptAfterType => "scriptAfterType",
            StateName::ScriptAfterTypeEquals => "scriptAfterTypeEquals",
            StateName::ScriptWithCustomType => "scriptWithCustomType",
            StateName::ScriptEmbedded => "scriptEmbedded",
            StateName::Style => "style",
            StateName::StyleAfterType => "styleAfterType",
            StateName::StyleAfterTypeEquals => "styleAfterTypeEquals",
            StateName::StyleWithCustomType => "styleWithCustomType",
            StateName::StyleEmbedded => "styleEmbedded",
            StateName::LiquidInHtmlAttribute => "liquidInHtmlAttribute",
            StateName::LiquidInHtmlAttributeEmbedded => "liquidInHtmlAttributeEmbedded",
            StateName::LiquidInSimpleState => "liquidInSimpleState",
            StateName::LiquidInEmbeddedState => "liquidInEmbeddedState",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a matched rule emits.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenSpec {
    /// Consume the match without emitting a token.
    None,
    /// One token covering the whole match.
    Class(TokenClass),
    /// One token per capture group, in group order. `None` entries consume silently.
    Groups(Vec<Option<TokenClass>>),
    /// Keyword if the match is a keyword, operator if it is an operator, otherwise the
    /// fallback (`None` consumes silently).
    Classify(Option<TokenClass>),
    /// Consume nothing; apply the transition and match again in the new state.
    Rematch,
}

/// Where the sub-language of a parametrized frame comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSource {
    Fixed(&'static str),
    /// Text of the given capture group of the current match.
    Capture(usize),
    /// The sub-language of the frame being left.
    Inherit,
}

/// Destination of a push or switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    State(StateName),
    Parametrized(StateName, LanguageSource),
    /// Template-expression state that remembers the current frame.
    Template(StateName),
    /// Back to the frame remembered by the current template state.
    Resume,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(Target),
    SwitchTo(Target),
    Pop,
}

/// Change to the active embedded sub-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embed {
    Keep,
    /// Start the sub-language carried by the frame on top after the transition.
    Enter,
    /// Stop delegating to the sub-lexer.
    Leave,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub token: TokenSpec,
    pub transition: Transition,
    pub embed: Embed,
}

impl Action {
    fn with_token(token: TokenSpec) -> Self {
        Self {
            token,
            transition: Transition::Stay,
            embed: Embed::Keep,
        }
    }

    pub fn none() -> Self {
        Self::with_token(TokenSpec::None)
    }

    pub fn token(class: TokenClass) -> Self {
        Self::with_token(TokenSpec::Class(class))
    }

    pub fn groups<I>(classes: I) -> Self
    where
        I: IntoIterator<Item = Option<TokenClass>>,
    {
        Self::with_token(TokenSpec::Groups(classes.into_iter().collect()))
    }

    pub fn classify(default: Option<TokenClass>) -> Self {
        Self::with_token(TokenSpec::Classify(default))
    }

    pub fn rematch() -> Self {
        Self::with_token(TokenSpec::Rematch)
    }

    pub fn push(mut self, target: Target) -> Self {
        self.transition = Transition::Push(target);
        self
    }

    pub fn switch_to(mut self, target: Target) -> Self {
        self.transition = Transition::SwitchTo(target);
        self
    }

    pub fn pop(mut self) -> Self {
        self.transition = Transition::Pop;
        self
    }

    pub fn enter_embedded(mut self) -> Self {
        self.embed = Embed::Enter;
        self
    }

    pub fn leave_embedded(mut self) -> Self {
        self.embed = Embed::Leave;
        self
    }
}

/// Entry of a rule list: a rule, or an include of a named rule group.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleDef {
    Rule {
        pattern: &'static str,
        action: Action,
    },
    Include(&'static str),
}

/// Ordered rules of one state or rule group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub rules: Vec<RuleDef>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, pattern: &'static str, action: Action) -> Self {
        self.rules.push(RuleDef::Rule { pattern, action });
        self
    }

    pub fn include(mut self, group: &'static str) -> Self {
        self.rules.push(RuleDef::Include(group));
        self
    }
}
