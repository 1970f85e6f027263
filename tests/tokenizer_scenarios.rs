//! Tokenization of realistic Liquid/HTML snippets
//!
//! Each test lexes a snippet with the built-in grammar and compares the full
//! `(class, text)` stream, so a rule-order regression shows up as a readable diff.

use liquid_lang::liquid::lexing::{Frame, Lexer, LexerState};
use liquid_lang::liquid::grammar::action::StateName;
use liquid_lang::liquid::testing::classes;
use rstest::rstest;

fn expect<'a>(pairs: &[(&str, &'a str)]) -> Vec<(String, &'a str)> {
    pairs
        .iter()
        .map(|(class, text)| (class.to_string(), *text))
        .collect()
}

#[test]
fn test_trimmed_expression_keeps_markers_with_delimiters() {
    assert_eq!(
        classes("{{- foo -}}"),
        expect(&[
            ("delimiter.liquid", "{{-"),
            ("variable.parameter.liquid", "foo"),
            ("delimiter.liquid", "-}}"),
        ])
    );
    assert_eq!(
        classes("{%- assign x = 1 -%}"),
        expect(&[
            ("delimiter.liquid", "{%-"),
            ("keyword", "assign"),
            ("variable.parameter.liquid", "x"),
            ("number", "1"),
            ("delimiter.liquid", "-%}"),
        ])
    );
}

#[test]
fn test_template_inside_custom_script_body() {
    let source = r#"<script type="text/x-custom">var a = {{ x }};</script>"#;
    assert_eq!(
        classes(source),
        expect(&[
            ("delimiter.html", "<"),
            ("tag.html", "script"),
            ("attribute.name", "type"),
            ("delimiter", "="),
            ("attribute.value", "\"text/x-custom\""),
            ("delimiter.html", ">"),
            ("embedded.text/x-custom", "var a = "),
            ("delimiter.liquid", "{{"),
            ("variable.parameter.liquid", "x"),
            ("delimiter.liquid", "}}"),
            ("embedded.text/x-custom", ";"),
            ("delimiter.html", "</"),
            ("tag.html", "script"),
            ("delimiter.html", ">"),
        ])
    );
}

#[test]
fn test_closing_template_restores_embedded_language() {
    let lexer = Lexer::new();
    let source = r#"<script type="text/x-custom">var a = {{ x"#;
    let line = lexer.tokenize_line(source, &LexerState::root());
    assert_eq!(
        line.end_state.to_string(),
        "liquidInEmbeddedState.scriptEmbedded.text/x-custom"
    );
    assert_eq!(line.end_state.embedded(), None);

    let next = lexer.tokenize_line(" }} more", &line.end_state);
    assert_eq!(next.end_state.embedded(), Some("text/x-custom"));
    assert_eq!(
        next.end_state.top(),
        &Frame::with_language(StateName::ScriptEmbedded, "text/x-custom")
    );
    assert_eq!(next.tokens.last().map(|t| t.span.clone()), Some(3..8));
}

#[test]
fn test_default_script_and_style_languages() {
    assert_eq!(
        classes("<script>go()</script>"),
        expect(&[
            ("delimiter.html", "<"),
            ("tag.html", "script"),
            ("delimiter.html", ">"),
            ("embedded.text/javascript", "go()"),
            ("delimiter.html", "</"),
            ("tag.html", "script"),
            ("delimiter.html", ">"),
        ])
    );
    assert_eq!(
        classes("<style>p{}</style>")[3],
        ("embedded.text/css".to_string(), "p{}")
    );
}

#[test]
fn test_stray_brace_inside_expression_is_skipped() {
    assert_eq!(
        classes("{{ } x }}"),
        expect(&[
            ("delimiter.liquid", "{{"),
            ("variable.parameter.liquid", "x"),
            ("delimiter.liquid", "}}"),
        ])
    );
}

#[rstest]
#[case("3.14", "number.float")]
#[case(".5", "number.float")]
#[case("42", "number")]
#[case("3e10", "number.float")]
#[case("1.5e-3", "number.float")]
fn test_numeric_literals(#[case] literal: &str, #[case] class: &str) {
    let source = format!("{{{{ {} }}}}", literal);
    let tokens = classes(&source);
    assert_eq!(tokens.len(), 3, "{:?}", tokens);
    assert_eq!(tokens[1], (class.to_string(), literal));
}

#[rstest]
#[case("if", "keyword")]
#[case("upcase", "keyword")]
#[case("and", "operator")]
#[case("or", "operator")]
#[case("product", "variable.parameter.liquid")]
#[case("If", "variable.parameter.liquid")]
fn test_identifier_classification(#[case] word: &str, #[case] class: &str) {
    let source = format!("{{% {} %}}", word);
    assert_eq!(classes(&source)[1], (class.to_string(), word));
}

#[test]
fn test_symbols_and_strings_in_expressions() {
    assert_eq!(
        classes(r#"{% if a == "b c" %}"#),
        expect(&[
            ("delimiter.liquid", "{%"),
            ("keyword", "if"),
            ("variable.parameter.liquid", "a"),
            ("operator", "=="),
            ("string.liquid", "\"b c\""),
            ("delimiter.liquid", "%}"),
        ])
    );
    // `|` is a symbol but not an operator
    assert_eq!(
        classes("{{ x | upcase }}"),
        expect(&[
            ("delimiter.liquid", "{{"),
            ("variable.parameter.liquid", "x"),
            ("keyword", "upcase"),
            ("delimiter.liquid", "}}"),
        ])
    );
}

#[test]
fn test_html_and_liquid_comments() {
    assert_eq!(
        classes("<!-- hi -->"),
        expect(&[
            ("comment.html", "<!--"),
            ("comment.content.html", " "),
            ("comment.content.html", "hi"),
            ("comment.content.html", " "),
            ("comment.html", "-->"),
        ])
    );
    assert_eq!(
        classes("{% comment %}x{% endcomment %}"),
        expect(&[
            ("comment.html", "{% comment %}"),
            ("comment.content.html", "x"),
            ("comment.html", "{% endcomment %}"),
        ])
    );
}

#[test]
fn test_templated_attribute_value() {
    assert_eq!(
        classes(r#"<a href="{{ url }}">"#),
        expect(&[
            ("delimiter.html", "<"),
            ("tag.html", "a"),
            ("attribute.name", "href"),
            ("delimiter", "="),
            ("delimiter.liquid", "\"{{"),
            ("variable.parameter.liquid", "url"),
            ("delimiter.liquid", "}}\""),
            ("delimiter.html", ">"),
        ])
    );
}

#[test]
fn test_markup_outside_templates() {
    assert_eq!(
        classes("<br/>Hello <p>42</p>"),
        expect(&[
            ("delimiter.html", "<"),
            ("tag.html", "br"),
            ("delimiter.html", "/>"),
            ("identifier", "Hello "),
            ("delimiter.html", "<"),
            ("tag.html", "p"),
            ("delimiter.html", ">"),
            ("number", "42"),
            ("delimiter.html", "</"),
            ("tag.html", "p"),
            ("delimiter.html", ">"),
        ])
    );
}

#[test]
fn test_unmatched_attribute_text_still_closes_tag() {
    let lexer = Lexer::new();
    let line = lexer.tokenize_line("<div {{ attrs }}>", &LexerState::root());
    assert_eq!(line.end_state, LexerState::root());
}

#[test]
fn test_stray_close_brace_in_markup_emits_nothing() {
    assert!(classes("}").is_empty());
    assert!(classes("}}}x").is_empty());

    let line = Lexer::new().tokenize_line("}}}x", &LexerState::root());
    assert!(line.tokens.is_empty());
    assert_eq!(line.end_state, LexerState::root());
}

#[rstest]
#[case(Frame::root())]
#[case(Frame::new(StateName::Script))]
#[case(Frame::new(StateName::ScriptAfterType))]
#[case(Frame::new(StateName::ScriptAfterTypeEquals))]
#[case(Frame::with_language(StateName::ScriptWithCustomType, "text/x-custom"))]
#[case(Frame::new(StateName::Style))]
#[case(Frame::new(StateName::StyleAfterType))]
#[case(Frame::new(StateName::StyleAfterTypeEquals))]
#[case(Frame::with_language(StateName::StyleWithCustomType, "text/x-c"))]
fn test_expression_returns_to_markup_state(#[case] frame: Frame) {
    let start = LexerState::starting_at(frame);
    let line = Lexer::new().tokenize_line("{{ x }}", &start);
    assert_eq!(line.end_state, start);
    assert_eq!(line.tokens.len(), 3);
}

#[test]
fn test_style_body_keeps_custom_language_across_expression() {
    let source = r#"<style type="text/x-c">a{{ x }}b"#;
    let line = Lexer::new().tokenize_line(source, &LexerState::root());
    assert_eq!(line.end_state.to_string(), "styleEmbedded.text/x-c [text/x-c]");

    let tokens = classes(source);
    assert_eq!(
        tokens[tokens.len() - 5..],
        expect(&[
            ("embedded.text/x-c", "a"),
            ("delimiter.liquid", "{{"),
            ("variable.parameter.liquid", "x"),
            ("delimiter.liquid", "}}"),
            ("embedded.text/x-c", "b"),
        ])[..]
    );
}
