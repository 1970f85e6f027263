//! Editor UI language
//!
//!     The embedding platform reports the user's language as a numeric locale id; the
//!     editor loads its UI strings by language code. English is the editor's built-in
//!     language and has the empty code.

/// Locale id the table falls back to.
pub const DEFAULT_LOCALE_ID: u32 = 1033;

#[rustfmt::skip]
const LANGUAGE_CODES: &[(u32, &str)] = &[
    (1026, "bg"), (1027, "ca"), (1029, "cs"), (1030, "da"), (1031, "de"), (1032, "el"),
    (1033, ""), (3082, "es"), (1061, "et"), (1069, "eu"), (1035, "fi"), (1036, "fr"),
    (1110, "gl"), (1081, "hi"), (1050, "hr"), (1038, "hu"), (1057, "id"), (1040, "it"),
    (1041, "ja"), (1087, "kk"), (1042, "ko"), (1063, "lt"), (1062, "lv"), (1086, "ms"),
    (1044, "nb"), (1043, "nl"), (1045, "pl"), (2070, "pt"), (1046, "pt-br"), (1048, "ro"),
    (1049, "ru"), (1051, "sk"), (1060, "sl"), (3098, "sr"), (2074, "sr-latn"), (1053, "sv"),
    (1054, "th"), (1055, "tr"), (1058, "uk"), (1066, "vi"), (2052, "zh-cn"), (3076, "zh-hk"),
    (1028, "zh-tw"),
];

/// UI language code for `locale_id`; unknown ids get the English entry.
pub fn ui_language_code(locale_id: u32) -> &'static str {
    lookup(locale_id)
        .or_else(|| lookup(DEFAULT_LOCALE_ID))
        .unwrap_or("")
}

/// All known `(locale id, code)` pairs.
pub fn language_codes() -> &'static [(u32, &'static str)] {
    LANGUAGE_CODES
}

fn lookup(locale_id: u32) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(id, _)| *id == locale_id)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case(1031, "de")]
    #[case(1033, "")]
    #[case(1046, "pt-br")]
    #[case(2070, "pt")]
    #[case(2074, "sr-latn")]
    #[case(1028, "zh-tw")]
    fn test_known_ids(#[case] id: u32, #[case] code: &str) {
        assert_eq!(ui_language_code(id), code);
    }

    #[test]
    fn test_unknown_id_falls_back_to_english() {
        assert_eq!(ui_language_code(0), "");
        assert_eq!(ui_language_code(9999), "");
    }

    #[test]
    fn test_table_has_unique_ids() {
        let ids: HashSet<_> = language_codes().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), 43);
        assert_eq!(language_codes().len(), 43);
    }
}
