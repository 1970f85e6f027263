//! Tokenizer rule table for Liquid in HTML
//!
//! State layout
//!
//!     root                         markup text, tags, comments, numbers
//!     comment                      `<!-- ... -->` and `{% comment %} ... {% endcomment %}`
//!     script / style               attributes of an opening `<script` / `<style` tag
//!     *AfterType, *AfterTypeEquals  after a `type` attribute name and its `=`
//!     *WithCustomType(lang)        the tag declared `type="lang"`
//!     *Embedded(lang)              tag body, delegated to the `lang` sub-lexer
//!     liquidInHtmlAttribute        attributes of any other tag
//!     liquidInHtmlAttributeEmbedded a quoted `"{{ ... }}"` attribute value
//!     liquidInSimpleState          template expression entered from markup
//!     liquidInEmbeddedState        template expression entered from a script/style body
//!
//!     Every markup state starts a template expression the same way: `{{` / `{%` is
//!     re-matched (nothing consumed) after switching to a template state that remembers
//!     the current frame. The closing `}}` / `%}` switches back to that frame, and from an
//!     embedded body also re-enters its sub-language.
//!
//!     Rule order is significant within a state. Template delimiters come first so that
//!     they win over attribute and text rules, and `{{-` / `{%-` are part of the same
//!     pattern as `{{` / `{%` so that the trim marker is never split off.

use super::action::{Action, LanguageSource, RuleSet, StateName, Target};
use crate::liquid::lexing::TokenClass;

const TEMPLATE_START: &str = r"\{\{|\{%";
const TEMPLATE_OPEN: &str = r"\{\{-?|\{%-?";
const TEMPLATE_CLOSE: &str = r"-?\}\}|-?%\}";
const IDENTIFIER: &str = r"[a-zA-Z_$][\w$]*";
const DOUBLE_QUOTED: &str = r#""([^"]*)""#;
const SINGLE_QUOTED: &str = r"'([^']*)'";
const ATTRIBUTE_NAME: &str = r"[\w\-]+";
const WHITESPACE: &str = r"[ \t\r\n]+";
const EXPONENT_FLOAT: &str = r"[0-9]+\.[0-9]*(?:[eE][\-+]?[0-9]+)?";
const LEADING_DOT_FLOAT: &str = r"\.[0-9]+(?:[eE][\-+]?[0-9]+)?";
const EXPONENT_ONLY_FLOAT: &str = r"[0-9]+[eE][\-+]?[0-9]+";
const SYMBOLS: &str = r"[~!@#%^&*+=|\\:`<>.?/]+";

pub const DEFAULT_SCRIPT_TYPE: &str = "text/javascript";
pub const DEFAULT_STYLE_TYPE: &str = "text/css";

pub const NUMBERS: &str = "numbers";
pub const LIQUID_ROOT: &str = "liquidRoot";

use TokenClass::*;

/// Named rule groups that states pull in with `include`.
pub fn groups() -> Vec<(&'static str, RuleSet)> {
    vec![
        (
            NUMBERS,
            RuleSet::new()
                .rule(EXPONENT_FLOAT, Action::token(NumberFloat))
                .rule(LEADING_DOT_FLOAT, Action::token(NumberFloat))
                .rule(EXPONENT_ONLY_FLOAT, Action::token(NumberFloat))
                .rule(r"[0-9]+", Action::token(Number))
                .rule(r"[;,.]", Action::token(Delimiter)),
        ),
        (
            LIQUID_ROOT,
            RuleSet::new()
                .rule(r#"'.*?'|".*?""#, Action::token(TokenClass::String))
                .rule(IDENTIFIER, Action::classify(Some(Variable)))
                .include(NUMBERS)
                .rule(SYMBOLS, Action::classify(None))
                .rule(WHITESPACE, Action::none()),
        ),
    ]
}

/// Every tokenizer state with its ordered rules.
pub fn states() -> Vec<(StateName, RuleSet)> {
    let mut states = vec![
        (StateName::Root, root()),
        (StateName::Comment, comment()),
        (StateName::LiquidInHtmlAttribute, html_attribute()),
        (
            StateName::LiquidInHtmlAttributeEmbedded,
            html_attribute_template(),
        ),
        (StateName::LiquidInSimpleState, template(false)),
        (StateName::LiquidInEmbeddedState, template(true)),
    ];
    states.extend(embedding_tag(EmbeddingTag::SCRIPT));
    states.extend(embedding_tag(EmbeddingTag::STYLE));
    states
}

fn root() -> RuleSet {
    RuleSet::new()
        .rule(r"([a-zA-Z_$][\w$]*)(\s*)", Action::token(Identifier))
        .rule(
            r"<!--",
            Action::token(CommentHtml).push(Target::State(StateName::Comment)),
        )
        .rule(
            r"\{%\s*comment\s*%\}",
            Action::token(CommentHtml).push(Target::State(StateName::Comment)),
        )
        .rule(TEMPLATE_START, enter_template(StateName::LiquidInSimpleState))
        .rule(
            r"(<)(\w+)(/>)",
            Action::groups([Some(DelimiterHtml), Some(TagHtml), Some(DelimiterHtml)]),
        )
        .rule(r"(<)(script)", open_tag(StateName::Script))
        .rule(r"(<)(style)", open_tag(StateName::Style))
        .rule(r"(<)([:\w]+)", open_tag(StateName::LiquidInHtmlAttribute))
        .rule(r"(</)(\w+)", open_tag(StateName::LiquidInHtmlAttribute))
        .rule(r"<", Action::token(DelimiterHtml))
        .rule(r"\{", Action::token(DelimiterHtml))
        .include(NUMBERS)
        .rule(WHITESPACE, Action::none())
        .rule(r"[^<{]+", Action::none())
}

fn comment() -> RuleSet {
    RuleSet::new()
        .rule(r"\{%\s*endcomment\s*%\}", Action::token(CommentHtml).pop())
        .rule(r"-->", Action::token(CommentHtml).pop())
        .rule(r"\w+", Action::token(CommentContentHtml))
        .rule(r".", Action::token(CommentContentHtml))
}

fn html_attribute() -> RuleSet {
    RuleSet::new()
        .rule(
            r#""\{\{-?|"\{%-?"#,
            Action::token(DelimiterLiquid)
                .push(Target::State(StateName::LiquidInHtmlAttributeEmbedded)),
        )
        .rule(r"/?>", Action::token(DelimiterHtml).pop())
        .rule(DOUBLE_QUOTED, Action::token(AttributeValue))
        .rule(SINGLE_QUOTED, Action::token(AttributeValue))
        .rule(ATTRIBUTE_NAME, Action::token(AttributeName))
        .rule(r"=", Action::token(Delimiter))
        .rule(WHITESPACE, Action::none())
}

fn html_attribute_template() -> RuleSet {
    RuleSet::new()
        .rule(r"'[^']*'", Action::token(TokenClass::String))
        .rule(r#"-?%\}"|-?\}\}""#, Action::token(DelimiterLiquid).pop())
        .rule(IDENTIFIER, Action::classify(Some(Variable)))
        .rule(WHITESPACE, Action::none())
}

fn template(from_embedded: bool) -> RuleSet {
    let close = Action::token(DelimiterLiquid).switch_to(Target::Resume);
    let close = if from_embedded {
        close.enter_embedded()
    } else {
        close
    };
    RuleSet::new()
        .rule(TEMPLATE_OPEN, Action::token(DelimiterLiquid))
        .rule(TEMPLATE_CLOSE, close)
        .include(LIQUID_ROOT)
}

fn enter_template(state: StateName) -> Action {
    Action::rematch().switch_to(Target::Template(state))
}

fn open_tag(next: StateName) -> Action {
    Action::groups([Some(DelimiterHtml), Some(TagHtml)]).push(Target::State(next))
}

/// Tags whose body is handed to an embedded sub-language: `<script>` and `<style>`.
struct EmbeddingTag {
    tag: StateName,
    after_type: StateName,
    after_type_equals: StateName,
    with_custom_type: StateName,
    embedded: StateName,
    default_type: &'static str,
    close_tag: &'static str,
    close_tag_rematch: &'static str,
    body_end: &'static str,
}

impl EmbeddingTag {
    const SCRIPT: EmbeddingTag = EmbeddingTag {
        tag: StateName::Script,
        after_type: StateName::ScriptAfterType,
        after_type_equals: StateName::ScriptAfterTypeEquals,
        with_custom_type: StateName::ScriptWithCustomType,
        embedded: StateName::ScriptEmbedded,
        default_type: DEFAULT_SCRIPT_TYPE,
        close_tag: r"(</)(script\s*)(>)",
        close_tag_rematch: r"</script\s*>",
        body_end: r"</script",
    };

    const STYLE: EmbeddingTag = EmbeddingTag {
        tag: StateName::Style,
        after_type: StateName::StyleAfterType,
        after_type_equals: StateName::StyleAfterTypeEquals,
        with_custom_type: StateName::StyleWithCustomType,
        embedded: StateName::StyleEmbedded,
        default_type: DEFAULT_STYLE_TYPE,
        close_tag: r"(</)(style\s*)(>)",
        close_tag_rematch: r"</style\s*>",
        body_end: r"</style",
    };

    fn open_body(&self, language: LanguageSource) -> Action {
        Action::token(DelimiterHtml)
            .push(Target::Parametrized(self.embedded, language))
            .enter_embedded()
    }

    fn open_default_body(&self) -> Action {
        self.open_body(LanguageSource::Fixed(self.default_type))
    }
}

fn embedding_tag(tag: EmbeddingTag) -> Vec<(StateName, RuleSet)> {
    let simple_template = || enter_template(StateName::LiquidInSimpleState);
    let leave_on_close = || Action::rematch().pop();

    let attributes = RuleSet::new()
        .rule(TEMPLATE_OPEN, simple_template())
        .rule(
            r"type",
            Action::token(AttributeName).push(Target::State(tag.after_type)),
        )
        .rule(DOUBLE_QUOTED, Action::token(AttributeValue))
        .rule(SINGLE_QUOTED, Action::token(AttributeValue))
        .rule(ATTRIBUTE_NAME, Action::token(AttributeName))
        .rule(r"=", Action::token(Delimiter))
        .rule(r">", tag.open_default_body())
        .rule(WHITESPACE, Action::none())
        .rule(
            tag.close_tag,
            Action::groups([Some(DelimiterHtml), Some(TagHtml), Some(DelimiterHtml)]).pop(),
        );

    // `<script type>` with no value still opens a default body
    let after_type = RuleSet::new()
        .rule(TEMPLATE_OPEN, simple_template())
        .rule(
            r"=",
            Action::token(Delimiter).push(Target::State(tag.after_type_equals)),
        )
        .rule(r">", tag.open_default_body())
        .rule(WHITESPACE, Action::none())
        .rule(tag.close_tag_rematch, leave_on_close());

    let custom_type = |capture| {
        Action::token(AttributeValue).switch_to(Target::Parametrized(
            tag.with_custom_type,
            LanguageSource::Capture(capture),
        ))
    };
    let after_type_equals = RuleSet::new()
        .rule(TEMPLATE_OPEN, simple_template())
        .rule(DOUBLE_QUOTED, custom_type(1))
        .rule(SINGLE_QUOTED, custom_type(1))
        .rule(r">", tag.open_default_body())
        .rule(WHITESPACE, Action::none())
        .rule(tag.close_tag_rematch, leave_on_close());

    let with_custom_type = RuleSet::new()
        .rule(TEMPLATE_OPEN, simple_template())
        .rule(r">", tag.open_body(LanguageSource::Inherit))
        .rule(DOUBLE_QUOTED, Action::token(AttributeValue))
        .rule(SINGLE_QUOTED, Action::token(AttributeValue))
        .rule(ATTRIBUTE_NAME, Action::token(AttributeName))
        .rule(r"=", Action::token(Delimiter))
        .rule(WHITESPACE, Action::none())
        .rule(tag.close_tag_rematch, leave_on_close());

    let body = RuleSet::new()
        .rule(
            TEMPLATE_OPEN,
            enter_template(StateName::LiquidInEmbeddedState).leave_embedded(),
        )
        .rule(tag.body_end, Action::rematch().pop().leave_embedded());

    vec![
        (tag.tag, attributes),
        (tag.after_type, after_type),
        (tag.after_type_equals, after_type_equals),
        (tag.with_custom_type, with_custom_type),
        (tag.embedded, body),
    ]
}
