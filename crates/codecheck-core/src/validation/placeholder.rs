use serde_yaml::Value;

use crate::config::PLACEHOLDER_TOKENS;
use crate::document::Document;

/// Whether `value` is a string containing any placeholder token, ignoring case.
/// Non-strings are never placeholders.
pub fn is_placeholder(value: &Value) -> bool {
    value.as_str().is_some_and(is_placeholder_str)
}

pub(crate) fn is_placeholder_str(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    PLACEHOLDER_TOKENS
        .iter()
        .any(|token| lower.contains(&token.to_lowercase()))
}

/// A top-level field counts as present when it is set, non-empty and not a placeholder.
///
/// `false` and `0` are present; only null, `""`, empty collections and placeholder
/// strings are not.
pub fn field_present(doc: &Document, field: &str) -> bool {
    match doc.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty() && !is_placeholder_str(s),
        Some(Value::Sequence(s)) => !s.is_empty(),
        Some(Value::Mapping(m)) => !m.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_placeholder_tokens_detected() {
        assert!(is_placeholder(&s("FIXME")));
        assert!(is_placeholder(&s("TODO: add title")));
        assert!(is_placeholder(&s("This is a template")));
        assert!(is_placeholder(&s("example value")));
        assert!(is_placeholder(&s("XXXXX")));
        assert!(is_placeholder(&s("https://doi.org/10.5281/zenodo.xxxxxxx")));
    }

    #[test]
    fn test_real_values_not_placeholders() {
        assert!(!is_placeholder(&s("Real Title")));
        assert!(!is_placeholder(&s("Actual Value")));
        assert!(!is_placeholder(&s("")));
    }

    #[test]
    fn test_non_strings_never_placeholders() {
        assert!(!is_placeholder(&Value::Null));
        assert!(!is_placeholder(&Value::Bool(true)));
        assert!(!is_placeholder(&Value::Number(12345.into())));
        assert!(!is_placeholder(&Value::Sequence(vec![s("FIXME")])));
    }

    #[test]
    fn test_field_present_rules() {
        let doc = Document::from_yaml_str(
            "a: ''\nb: []\nc: {}\nd: FIXME\ne: real\nf: false\ng: 0\nh: ~",
        )
        .unwrap();
        for missing in ["a", "b", "c", "d", "h", "absent"] {
            assert!(!field_present(&doc, missing), "{missing} should be absent");
        }
        for present in ["e", "f", "g"] {
            assert!(field_present(&doc, present), "{present} should be present");
        }
    }

    proptest! {
        #[test]
        fn prop_token_anywhere_is_placeholder(
            prefix in "[ a-zA-Z0-9:./-]{0,16}",
            suffix in "[ a-zA-Z0-9:./-]{0,16}",
            token_idx in 0..PLACEHOLDER_TOKENS.len(),
            upper in any::<bool>(),
        ) {
            let token = PLACEHOLDER_TOKENS[token_idx];
            let token = if upper { token.to_uppercase() } else { token.to_lowercase() };
            let value = format!("{prefix}{token}{suffix}");
            prop_assert!(is_placeholder(&Value::String(value)));
        }

        #[test]
        fn prop_digits_only_never_placeholder(value in "[0-9 -]{0,32}") {
            prop_assert!(!is_placeholder(&Value::String(value)));
        }
    }
}
