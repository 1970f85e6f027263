//! Property-based tests for the lexer
//!
//! Whatever the input and start state, lexing terminates without panicking and
//! produces in-bounds, ordered, non-overlapping, non-empty spans on char boundaries.

use liquid_lang::liquid::grammar::action::StateName;
use liquid_lang::liquid::lexing::{Frame, Lexer, LexerOptions, LexerState, Token};
use proptest::prelude::*;

/// Text biased towards the characters the grammar cares about.
fn template_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[<>{}%\\-=/!\"'.a-z0-9 \t\n]{0,80}",
        prop::collection::vec(
            prop_oneof![
                Just("{{".to_string()),
                Just("}}".to_string()),
                Just("{%-".to_string()),
                Just("-%}".to_string()),
                Just("<script".to_string()),
                Just("</script>".to_string()),
                Just("<style>".to_string()),
                Just(" type=\"x\"".to_string()),
                Just("<!--".to_string()),
                Just("-->".to_string()),
                Just(">".to_string()),
                Just("é".to_string()),
                "[a-z0-9 .]{1,6}",
            ],
            0..24,
        )
        .prop_map(|parts| parts.concat()),
    ]
}

fn start_state() -> impl Strategy<Value = LexerState> {
    (
        prop::sample::select(StateName::ALL.to_vec()),
        prop::option::of("[a-z/]{1,12}"),
        any::<bool>(),
    )
        .prop_map(|(state, language, nested)| {
            let frame = Frame {
                state,
                language,
                resume: None,
            };
            if nested {
                LexerState::starting_at(Frame::template(StateName::LiquidInSimpleState, frame))
            } else {
                LexerState::starting_at(frame)
            }
        })
}

fn assert_well_formed(tokens: &[Token], text: &str) {
    let mut last_end = 0;
    for token in tokens {
        assert!(token.span.start < token.span.end, "empty span {:?}", token);
        assert!(token.span.start >= last_end, "overlap at {:?}", token);
        assert!(token.span.end <= text.len(), "out of bounds {:?}", token);
        assert!(text.is_char_boundary(token.span.start));
        assert!(text.is_char_boundary(token.span.end));
        last_end = token.span.end;
    }
}

proptest! {
    #[test]
    fn test_document_spans_are_well_formed(text in template_text()) {
        let tokens = Lexer::new().tokenize(&text);
        assert_well_formed(&tokens, &text);
    }

    #[test]
    fn test_any_start_state_terminates(text in "[^\n]{0,60}", state in start_state()) {
        let line = Lexer::new().tokenize_line(&text, &state);
        assert_well_formed(&line.tokens, &text);
        prop_assert!(line.end_state.depth() >= 1);
    }

    #[test]
    fn test_small_limits_still_terminate(text in template_text(), depth in 1usize..4, rematch in 0usize..3) {
        let lexer = Lexer::new().with_options(LexerOptions {
            max_stack_depth: depth,
            max_rematch: rematch,
        });
        for line in lexer.tokenize_lines(&text) {
            prop_assert!(line.end_state.depth() <= depth);
        }
    }

    #[test]
    fn test_line_by_line_matches_whole_document(text in template_text()) {
        let lexer = Lexer::new();
        let whole = lexer.tokenize(&text);

        let mut state = LexerState::root();
        let mut offset = 0;
        let mut joined = Vec::new();
        for line in text.split('\n') {
            let result = lexer.tokenize_line(line, &state);
            joined.extend(result.tokens.into_iter().map(|mut token| {
                token.span = token.span.start + offset..token.span.end + offset;
                token
            }));
            state = result.end_state;
            offset += line.len() + 1;
        }
        prop_assert_eq!(whole, joined);
    }
}
