//! Lexer
//!
//!     A finite-state lexer driven by a [`GrammarDefinition`]. At each position the rules
//!     of the top frame's state are tried in order; the first anchored match wins and its
//!     action emits tokens, moves the state stack and toggles the embedded sub-language.
//!
//! Lines and restarts
//!
//!     Tokenization works line by line. [`Lexer::tokenize_line`] takes the state the
//!     previous line ended in and returns the state this line ends in, so an editor can
//!     re-tokenize any line from a saved [`LexerState`] without looking back.
//!
//! Embedded bodies
//!
//!     While a sub-language is active, the lexer searches the rest of the line for the
//!     leftmost match of a rule that leaves the sub-language (`</script`, `{{`, ...).
//!     Text before that point is handed to the [`SubLexer`]; the rule itself is then
//!     matched normally.
//!
//! Progress
//!
//!     The lexer never gets stuck. When no rule matches, it consumes one character and
//!     emits nothing. A rule that consumes nothing (`rematch`, or an empty match) must
//!     change the state; if it does not, or if rematches chain past
//!     [`LexerOptions::max_rematch`], the state change is dropped and the same
//!     one-character fallback applies.

pub mod state;
pub mod sublexer;
pub mod tokens;

pub use state::{Frame, LexerState};
pub use sublexer::{OpaqueSubLexer, SubLexer};
pub use tokens::{Token, TokenClass};

use crate::liquid::grammar::action::{
    Action, Embed, LanguageSource, StateName, Target, TokenSpec, Transition,
};
use crate::liquid::grammar::{self, CompiledRule, GrammarDefinition};
use regex::Captures;
use serde::Serialize;
use tracing::{trace, warn};

/// Limits that keep a misbehaving table from running away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    pub max_stack_depth: usize,
    /// Templates are entered through a rematch, so below 1 no `{{` or `{%` opens one.
    pub max_rematch: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            max_stack_depth: 100,
            max_rematch: 8,
        }
    }
}

/// Tokens of one line (or of a line range) and the state lexing stopped in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTokens {
    /// Byte offset of the line in the text its spans refer to.
    pub start: usize,
    pub tokens: Vec<Token>,
    pub end_state: LexerState,
}

pub struct Lexer<'g, S = OpaqueSubLexer> {
    grammar: &'g GrammarDefinition,
    sub_lexer: S,
    options: LexerOptions,
}

impl Lexer<'static> {
    /// Lexer for the built-in Liquid grammar.
    pub fn new() -> Self {
        Self::with_grammar(grammar::liquid())
    }
}

impl Default for Lexer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'g> Lexer<'g> {
    pub fn with_grammar(grammar: &'g GrammarDefinition) -> Self {
        Self {
            grammar,
            sub_lexer: OpaqueSubLexer,
            options: LexerOptions::default(),
        }
    }
}

impl<'g, S: SubLexer> Lexer<'g, S> {
    pub fn with_sub_lexer<T: SubLexer>(self, sub_lexer: T) -> Lexer<'g, T> {
        Lexer {
            grammar: self.grammar,
            sub_lexer,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: LexerOptions) -> Self {
        self.options = options;
        self
    }

    /// Tokenize a whole document from the root state. Spans are document offsets.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.tokenize_lines(text)
            .into_iter()
            .flat_map(|line| line.tokens)
            .collect()
    }

    /// Tokenize a document line by line, keeping the state each line ends in. Spans are
    /// document offsets. A trailing `\r` is not part of a line.
    pub fn tokenize_lines(&self, text: &str) -> Vec<LineTokens> {
        let mut lines = Vec::new();
        let mut state = LexerState::root();
        let mut start = 0;
        for raw in text.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let mut result = self.tokenize_line(line, &state);
            state = result.end_state.clone();
            result.start = start;
            result.tokens = result
                .tokens
                .into_iter()
                .map(|token| token.shifted(start))
                .collect();
            lines.push(result);
            start += raw.len() + 1;
        }
        lines
    }

    /// Tokenize one line starting in `state`. Spans are line offsets.
    pub fn tokenize_line(&self, line: &str, state: &LexerState) -> LineTokens {
        let mut state = state.clone();
        let mut tokens = Vec::new();
        let mut pos = 0;
        let mut rematches = 0;

        while pos < line.len() {
            if let Some(language) = state.embedded().map(str::to_owned) {
                let end = self
                    .leave_offset(state.top().state, &line[pos..])
                    .map_or(line.len(), |offset| pos + offset);
                if end > pos {
                    tokens.extend(
                        self.sub_lexer
                            .tokenize(&language, &line[pos..end])
                            .into_iter()
                            .map(|token| token.shifted(pos)),
                    );
                    pos = end;
                    continue;
                }
            }

            let rest = &line[pos..];
            let Some((rule, captures)) = self.match_rule(state.top().state, rest) else {
                pos += char_len(rest);
                rematches = 0;
                continue;
            };

            let matched = captures.get(0).map_or(0, |m| m.len());
            let consumes = matched > 0 && rule.action.token != TokenSpec::Rematch;

            if !consumes {
                let before = state.clone();
                self.apply(&mut state, &rule.action, &captures);
                rematches += 1;
                if state == before || rematches > self.options.max_rematch {
                    warn!(
                        pattern = rule.pattern,
                        state = %before,
                        "rule made no progress, consuming one character"
                    );
                    state = before;
                    pos += char_len(rest);
                    rematches = 0;
                }
                continue;
            }

            self.emit(&rule.action.token, &captures, pos, &mut tokens);
            self.apply(&mut state, &rule.action, &captures);
            pos += matched;
            rematches = 0;
        }

        LineTokens {
            start: 0,
            tokens,
            end_state: state,
        }
    }

    fn match_rule<'r, 'h>(
        &'r self,
        state: StateName,
        rest: &'h str,
    ) -> Option<(&'r CompiledRule, Captures<'h>)> {
        self.grammar
            .rules(state)
            .iter()
            .find_map(|rule| rule.anchored.captures(rest).map(|caps| (rule, caps)))
    }

    /// Leftmost offset in `rest` where a rule of `state` that leaves the sub-language
    /// matches.
    fn leave_offset(&self, state: StateName, rest: &str) -> Option<usize> {
        self.grammar
            .rules(state)
            .iter()
            .filter_map(|rule| rule.search.as_ref())
            .filter_map(|search| search.find(rest).map(|m| m.start()))
            .min()
    }

    fn emit(&self, spec: &TokenSpec, captures: &Captures<'_>, pos: usize, out: &mut Vec<Token>) {
        let Some(whole) = captures.get(0) else {
            return;
        };
        match spec {
            TokenSpec::None | TokenSpec::Rematch => {}
            TokenSpec::Class(class) => {
                out.push(Token::new(class.clone(), pos..pos + whole.end()));
            }
            TokenSpec::Groups(classes) => {
                for (index, class) in classes.iter().enumerate() {
                    if let (Some(class), Some(group)) = (class, captures.get(index + 1)) {
                        if !group.is_empty() {
                            out.push(Token::new(
                                class.clone(),
                                pos + group.start()..pos + group.end(),
                            ));
                        }
                    }
                }
            }
            TokenSpec::Classify(fallback) => {
                if let Some(class) = self.grammar.classify(whole.as_str(), fallback.as_ref()) {
                    out.push(Token::new(class, pos..pos + whole.end()));
                }
            }
        }
    }

    fn apply(&self, state: &mut LexerState, action: &Action, captures: &Captures<'_>) {
        match &action.transition {
            Transition::Stay => {}
            Transition::Push(target) => {
                let frame = resolve(target, state.top(), captures);
                trace!(from = %state.top(), to = %frame, "push");
                if !state.push(frame, self.options.max_stack_depth) {
                    warn!(
                        depth = state.depth(),
                        "tokenizer stack limit reached, staying in {}",
                        state.top()
                    );
                }
            }
            Transition::SwitchTo(target) => {
                let frame = resolve(target, state.top(), captures);
                trace!(from = %state.top(), to = %frame, "switch");
                state.switch_to(frame);
            }
            Transition::Pop => {
                trace!(from = %state.top(), "pop");
                state.pop();
            }
        }
        match action.embed {
            Embed::Keep => {}
            Embed::Enter => state.enter_embedded(),
            Embed::Leave => state.leave_embedded(),
        }
    }
}

/// The frame a transition lands on, given the frame it starts from.
fn resolve(target: &Target, current: &Frame, captures: &Captures<'_>) -> Frame {
    match target {
        Target::State(name) => Frame::new(*name),
        Target::Parametrized(name, source) => {
            let language = match source {
                LanguageSource::Fixed(language) => Some(language.to_string()),
                LanguageSource::Capture(index) => {
                    captures.get(*index).map(|m| m.as_str().to_string())
                }
                LanguageSource::Inherit => current.language.clone(),
            };
            Frame {
                state: *name,
                language,
                resume: None,
            }
        }
        Target::Template(name) => Frame::template(*name, current.clone()),
        Target::Resume => current.resume.as_deref().cloned().unwrap_or_else(Frame::root),
    }
}

fn char_len(rest: &str) -> usize {
    rest.chars().next().map_or(1, char::len_utf8)
}
