//! Keyword and operator vocabularies
//!
//!     Keywords are the tag names, portal tags and standard filters of the template
//!     language. Order is insertion order and is what completions are listed in;
//!     classification only tests membership.

/// Tags, filters and literal keywords, case-sensitive.
#[rustfmt::skip]
pub const KEYWORDS: &[&str] = &[
    // tags
    "assign", "capture", "endcapture", "increment", "decrement",
    "if", "else", "elsif", "endif",
    "for", "endfor", "break", "continue", "limit", "offset", "range", "reversed", "cols",
    "case", "endcase", "when",
    "block", "endblock",
    "true", "false", "in",
    "unless", "endunless",
    "cycle", "tablerow", "endtablerow",
    "contains", "startswith", "endswith",
    "comment", "endcomment", "raw", "endraw",
    // portal tags and objects
    "editable", "endentitylist", "endentityview", "endinclude", "endmarker",
    "entitylist", "entityview", "forloop", "image", "include", "marker",
    "outputcache", "plugin", "style", "text", "widget",
    // filters
    "abs", "append", "at_least", "at_most", "capitalize", "ceil", "compact", "concat",
    "date", "default", "divided_by", "downcase", "escape", "escape_once", "first",
    "floor", "join", "last", "lstrip", "map", "minus", "modulo", "newline_to_br",
    "plus", "prepend", "remove", "remove_first", "replace", "replace_first", "reverse",
    "round", "rstrip", "size", "slice", "sort", "sort_natural", "split", "strip",
    "strip_html", "strip_newlines", "times", "truncate", "truncatewords", "uniq",
    "upcase", "url_decode", "url_encode",
];

/// Comparison and logical operators.
pub const OPERATORS: &[&str] = &["==", ">", "<", "<=", ">=", "!=", "and", "or"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keywords_are_unique() {
        let unique: HashSet<_> = KEYWORDS.iter().collect();
        assert_eq!(unique.len(), KEYWORDS.len());
        assert_eq!(KEYWORDS.len(), 101);
    }

    #[test]
    fn test_word_operators_are_not_keywords() {
        for op in ["and", "or"] {
            assert!(OPERATORS.contains(&op));
            assert!(!KEYWORDS.contains(&op));
        }
    }
}
