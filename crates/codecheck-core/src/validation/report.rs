//! Human-readable rendering of validation issues.

use serde::{Deserialize, Serialize};

use super::{Level, ValidationIssue};

/// Output flavour of [`format_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    #[default]
    Markdown,
    Text,
}

struct Section {
    level: Level,
    markdown: &'static str,
    text: &'static str,
}

const SECTIONS: &[Section] = &[
    Section {
        level: Level::Error,
        markdown: "## ❌ Errors",
        text: "ERRORS",
    },
    Section {
        level: Level::Warning,
        markdown: "## ⚠️  Warnings",
        text: "WARNINGS",
    },
    Section {
        level: Level::Info,
        markdown: "## ℹ️  Information",
        text: "INFORMATION",
    },
];

/// Group issues by level (errors, warnings, information) keeping their order within a group.
pub fn format_report(issues: &[ValidationIssue], style: ReportStyle) -> String {
    if issues.is_empty() {
        return match style {
            ReportStyle::Markdown => "## ✓ All validations passed!".to_string(),
            ReportStyle::Text => "✓ All validations passed!".to_string(),
        };
    }

    let mut lines: Vec<String> = Vec::new();
    for section in SECTIONS {
        let group: Vec<&ValidationIssue> =
            issues.iter().filter(|i| i.level == section.level).collect();
        if group.is_empty() {
            continue;
        }
        // Every section after the first starts with a blank line.
        let lead = if lines.is_empty() { "" } else { "\n" };

        match style {
            ReportStyle::Markdown => {
                lines.push(format!("{}{} ({})\n", lead, section.markdown, group.len()));
                for issue in group {
                    lines.push(format!("- **{}**: {}", issue.field, issue.message));
                    if let Some(suggestion) = &issue.suggestion {
                        lines.push(format!("  - *Suggestion*: {}", suggestion));
                    }
                }
            }
            ReportStyle::Text => {
                lines.push(format!("{}{} ({}):", lead, section.text, group.len()));
                for issue in group {
                    lines.push(format!("  [{}] {}", issue.field, issue.message));
                    if let Some(suggestion) = &issue.suggestion {
                        lines.push(format!("    → {}", suggestion));
                    }
                }
            }
        }
    }
    lines.join("\n")
}
