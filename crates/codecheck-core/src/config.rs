//! Fixed validation vocabulary for `codecheck.yml`.
//!
//! Field lists, placeholder heuristics and expected formats. Rules in
//! [`crate::validation`] read these; nothing here is configurable at runtime.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fields that must be present and not a placeholder.
pub const MANDATORY_FIELDS: &[&str] = &["manifest", "codechecker", "report"];

/// Fields a complete certificate should carry.
pub const RECOMMENDED_FIELDS: &[&str] = &[
    "version",
    "paper",
    "repository",
    "check_time",
    "certificate",
];

/// Recognised but never required.
pub const OPTIONAL_FIELDS: &[&str] = &["summary", "source"];

/// Case-insensitive substrings that mark a value as left over from a template.
pub const PLACEHOLDER_TOKENS: &[&str] = &[
    "FIXME",
    "TODO",
    "template",
    "example",
    "XXXXX",
    "placeholder",
];

pub const PAPER_FIELDS: &[&str] = &["title", "authors", "reference"];
pub const MANIFEST_ENTRY_FIELDS: &[&str] = &["file"];

/// Outputs live at `<base>/codecheck/outputs/<declared path>`.
pub const CODECHECK_DIR: &str = "codecheck";
pub const OUTPUTS_DIR: &str = "outputs";

/// Missing manifest files listed by name before the list is elided.
pub const MISSING_FILES_SHOWN: usize = 5;

/// `YYYY-NNN`, e.g. `2023-001`.
pub static CERTIFICATE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{3}$").unwrap());

/// Certificate ids that look valid but were never filled in.
pub static CERTIFICATE_PLACEHOLDERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^YYYY-\d{3}$").unwrap(), // year placeholder
        Regex::new(r"^0000-\d{3}$").unwrap(),
        Regex::new(r"^9999-\d{3}$").unwrap(),
    ]
});

/// Report DOI/URL fragments left over from the template.
pub static DOI_PLACEHOLDERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)XXXXX").unwrap(),
        Regex::new(r"(?i)placeholder").unwrap(),
        Regex::new(r"(?i)example").unwrap(),
        Regex::new(r"(?i)10\.5281/zenodo\.XXXXXX").unwrap(),
    ]
});

/// Four groups of four digits, the last character a digit or the `X` checksum.
pub static ORCID_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[0-9X]$").unwrap());

pub static DOI_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^10\.\d{4,}/\S+$").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile_to_real_matchers() {
        assert!(CERTIFICATE_FORMAT.is_match("2023-001"));
        assert!(!CERTIFICATE_FORMAT.is_match("23-1"));
        assert_eq!(CERTIFICATE_PLACEHOLDERS.len(), 3);
        assert!(CERTIFICATE_PLACEHOLDERS[0].is_match("YYYY-001"));
        assert!(ORCID_FORMAT.is_match("0000-0002-1825-009X"));
        assert!(!ORCID_FORMAT.is_match("0000-0002-1825-00"));
        assert!(DOI_FORMAT.is_match("10.5281/zenodo.3750741"));
        assert!(DOI_PLACEHOLDERS
            .iter()
            .any(|re| re.is_match("https://doi.org/10.5281/zenodo.xxxxxx")));
    }

    #[test]
    fn test_field_lists_do_not_overlap() {
        for field in MANDATORY_FIELDS {
            assert!(!RECOMMENDED_FIELDS.contains(field));
            assert!(!OPTIONAL_FIELDS.contains(field));
        }
    }
}
