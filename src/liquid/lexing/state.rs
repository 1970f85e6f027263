//! Lexer state snapshots
//!
//!     The lexer is restartable: everything it needs to continue at the start of the next
//!     line is a [`LexerState`] value. A state is a stack of [`Frame`]s plus the embedded
//!     sub-language that is currently active, if any.
//!
//!     A frame is a state name with its parameters. Tag bodies carry their sub-language
//!     (`scriptEmbedded` + `text/javascript`). Template-expression frames carry the frame
//!     they were entered from, so the closing delimiter restores the state and its
//!     sub-language in one assignment.

use crate::liquid::grammar::action::StateName;
use serde::{Deserialize, Serialize};
use std::fmt;

static ROOT_FRAME: Frame = Frame {
    state: StateName::Root,
    language: None,
    resume: None,
};

/// One entry of the state stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    pub state: StateName,
    /// Sub-language parameter (`type="..."` of a script or style tag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Frame a template-expression state returns to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<Box<Frame>>,
}

impl Frame {
    pub fn new(state: StateName) -> Self {
        Self {
            state,
            language: None,
            resume: None,
        }
    }

    pub fn root() -> Self {
        Self::new(StateName::Root)
    }

    pub fn with_language(state: StateName, language: impl Into<String>) -> Self {
        Self {
            state,
            language: Some(language.into()),
            resume: None,
        }
    }

    pub fn template(state: StateName, resume: Frame) -> Self {
        Self {
            state,
            language: None,
            resume: Some(Box::new(resume)),
        }
    }
}

/// Dotted state id: `scriptEmbedded.text/javascript`,
/// `liquidInSimpleState.scriptWithCustomType.text/x-custom`.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        if let Some(resume) = &self.resume {
            write!(f, ".{}", resume)?;
        }
        if let Some(language) = &self.language {
            write!(f, ".{}", language)?;
        }
        Ok(())
    }
}

/// Serialized form, validated on the way in.
#[derive(Deserialize)]
struct Snapshot {
    stack: Vec<Frame>,
    #[serde(default)]
    embedded: Option<String>,
}

/// Complete lexer state between two lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Snapshot")]
pub struct LexerState {
    /// Never empty; the bottom frame is where lexing started.
    stack: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embedded: Option<String>,
}

impl TryFrom<Snapshot> for LexerState {
    type Error = String;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        if snapshot.stack.is_empty() {
            return Err("lexer state needs at least one frame".to_string());
        }
        Ok(Self {
            stack: snapshot.stack,
            embedded: snapshot.embedded,
        })
    }
}

impl Default for LexerState {
    fn default() -> Self {
        Self::root()
    }
}

impl LexerState {
    /// Initial state: markup scanning, nothing embedded.
    pub fn root() -> Self {
        Self::starting_at(Frame::root())
    }

    pub fn starting_at(frame: Frame) -> Self {
        Self {
            stack: vec![frame],
            embedded: None,
        }
    }

    pub fn top(&self) -> &Frame {
        self.stack.last().unwrap_or(&ROOT_FRAME)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Sub-language the current text is delegated to.
    pub fn embedded(&self) -> Option<&str> {
        self.embedded.as_deref()
    }

    /// Pushes unless the stack already holds `max_depth` frames.
    pub(crate) fn push(&mut self, frame: Frame, max_depth: usize) -> bool {
        if self.stack.len() >= max_depth {
            return false;
        }
        self.stack.push(frame);
        true
    }

    pub(crate) fn switch_to(&mut self, frame: Frame) {
        match self.stack.last_mut() {
            Some(top) => *top = frame,
            None => self.stack.push(frame),
        }
    }

    /// Pops the top frame. The bottom frame is never popped.
    pub(crate) fn pop(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub(crate) fn enter_embedded(&mut self) {
        self.embedded = self.top().language.clone();
    }

    pub(crate) fn leave_embedded(&mut self) {
        self.embedded = None;
    }
}

impl fmt::Display for LexerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.top())?;
        if let Some(language) = &self.embedded {
            write!(f, " [{}]", language)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_ids() {
        let custom = Frame::with_language(StateName::ScriptWithCustomType, "text/x-custom");
        assert_eq!(custom.to_string(), "scriptWithCustomType.text/x-custom");

        let template = Frame::template(StateName::LiquidInSimpleState, custom);
        assert_eq!(
            template.to_string(),
            "liquidInSimpleState.scriptWithCustomType.text/x-custom"
        );
        assert_eq!(Frame::root().to_string(), "root");
    }

    #[test]
    fn test_bottom_frame_is_never_popped() {
        let mut state = LexerState::root();
        state.pop();
        state.pop();
        assert_eq!(state.depth(), 1);
        assert_eq!(state.top().state, StateName::Root);
    }

    #[test]
    fn test_push_respects_depth_limit() {
        let mut state = LexerState::root();
        assert!(state.push(Frame::new(StateName::Script), 2));
        assert!(!state.push(Frame::new(StateName::Comment), 2));
        assert_eq!(state.top().state, StateName::Script);
    }

    #[test]
    fn test_enter_embedded_uses_top_language() {
        let mut state = LexerState::root();
        state.push(
            Frame::with_language(StateName::StyleEmbedded, "text/css"),
            10,
        );
        state.enter_embedded();
        assert_eq!(state.embedded(), Some("text/css"));
        assert_eq!(state.to_string(), "styleEmbedded.text/css [text/css]");
        state.leave_embedded();
        assert_eq!(state.embedded(), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = LexerState::root();
        state.push(
            Frame::template(
                StateName::LiquidInEmbeddedState,
                Frame::with_language(StateName::ScriptEmbedded, "text/javascript"),
            ),
            10,
        );
        let json = serde_json::to_string(&state).unwrap();
        let back: LexerState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_empty_snapshot_is_rejected() {
        let result: Result<LexerState, _> = serde_json::from_str(r#"{"stack":[]}"#);
        assert!(result.is_err());
    }
}
