//! Static rule registry. Rules run in declaration order and never depend on each
//! other's results.

use std::path::Path;

use serde_yaml::Value;

use super::placeholder::field_present;
use super::ValidationIssue;
use crate::config::{
    CERTIFICATE_FORMAT, CERTIFICATE_PLACEHOLDERS, CODECHECK_DIR, DOI_FORMAT, DOI_PLACEHOLDERS,
    MANDATORY_FIELDS, MANIFEST_ENTRY_FIELDS, MISSING_FILES_SHOWN, ORCID_FORMAT, OUTPUTS_DIR,
    PAPER_FIELDS, RECOMMENDED_FIELDS,
};
use crate::document::{display_value, is_blank, non_blank, type_name, Document};
use crate::register::{RegisterLookup, RegisterOutcome, UnavailableReason, REGISTER_ISSUES_URL};
use crate::timestamp::parse_iso8601;

/// What a rule sees.
pub struct RuleContext<'a> {
    pub doc: &'a Document,
    /// Directory containing `codecheck/outputs/`.
    pub base_dir: &'a Path,
    pub check_manifest: bool,
    pub register: Option<&'a dyn RegisterLookup>,
}

/// Rule definition for the registry.
pub struct RuleDefinition {
    pub id: &'static str,
    pub description: &'static str,
    pub check: fn(&RuleContext<'_>) -> Vec<ValidationIssue>,
}

/// Rules in execution order.
pub static RULES: &[RuleDefinition] = &[
    RuleDefinition {
        id: "field-completeness",
        description: "Mandatory fields present, recommended fields noted",
        check: check_field_completeness,
    },
    RuleDefinition {
        id: "manifest-structure",
        description: "Manifest is a non-empty list of entries with a file",
        check: rule_manifest_structure,
    },
    RuleDefinition {
        id: "codechecker-structure",
        description: "Codechecker is a mapping with a name",
        check: rule_codechecker_structure,
    },
    RuleDefinition {
        id: "paper-structure",
        description: "Paper is a mapping with title, authors and reference",
        check: rule_paper_structure,
    },
    RuleDefinition {
        id: "certificate-id",
        description: "Certificate id has the YYYY-NNN shape",
        check: rule_certificate_id,
    },
    RuleDefinition {
        id: "report-doi",
        description: "Report is a URL or DOI",
        check: rule_report,
    },
    RuleDefinition {
        id: "orcid-format",
        description: "ORCIDs of codechecker and authors are well formed",
        check: rule_orcids,
    },
    RuleDefinition {
        id: "check-time",
        description: "check_time is an ISO 8601 timestamp",
        check: rule_check_time,
    },
    RuleDefinition {
        id: "manifest-files",
        description: "Manifest files exist under codecheck/outputs/",
        check: rule_manifest_files,
    },
    RuleDefinition {
        id: "register-issue",
        description: "The register has a record for the certificate",
        check: rule_register,
    },
];

fn rule_manifest_structure(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_manifest_structure(ctx.doc)
}

fn rule_codechecker_structure(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_codechecker_structure(ctx.doc)
}

fn rule_paper_structure(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_paper_structure(ctx.doc)
}

fn rule_certificate_id(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_certificate_id(ctx.doc)
}

fn rule_report(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_report(ctx.doc)
}

fn rule_orcids(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_orcids(ctx.doc)
}

fn rule_check_time(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    check_check_time(ctx.doc)
}

fn rule_manifest_files(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    if !ctx.check_manifest {
        return Vec::new();
    }
    check_manifest_files(ctx.doc, ctx.base_dir)
}

fn rule_register(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    match ctx.register {
        Some(lookup) => check_register(ctx.doc, lookup).issues,
        None => Vec::new(),
    }
}

fn check_field_completeness(ctx: &RuleContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in MANDATORY_FIELDS {
        if !field_present(ctx.doc, field) {
            issues.push(
                ValidationIssue::error(
                    *field,
                    format!("Mandatory field '{}' is missing or empty", field),
                )
                .with_suggestion(format!(
                    "Add '{}' field to codecheck.yml with appropriate value",
                    field
                )),
            );
        }
    }

    for field in RECOMMENDED_FIELDS {
        if !field_present(ctx.doc, field) {
            issues.push(
                ValidationIssue::warning(*field, format!("Recommended field '{}' is missing", field))
                    .with_suggestion(format!(
                        "Consider adding '{}' for a complete certificate",
                        field
                    )),
            );
        }
    }

    issues
}

pub(crate) fn check_manifest_structure(doc: &Document) -> Vec<ValidationIssue> {
    let Some(manifest) = non_blank(doc.get("manifest")) else {
        // Reported by field completeness.
        return Vec::new();
    };

    let Some(entries) = manifest.as_sequence() else {
        return vec![ValidationIssue::error(
            "manifest",
            format!("Manifest must be a list, got {}", type_name(manifest)),
        )
        .with_suggestion("Structure manifest as list: [{file: '...', comment: '...'}, ...]")];
    };

    let mut issues = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if !entry.is_mapping() {
            issues.push(
                ValidationIssue::error(
                    format!("manifest[{}]", i),
                    format!("Manifest entry {} must be a mapping", i + 1),
                )
                .with_suggestion("Use format: {file: '...', comment: '...'}"),
            );
            continue;
        }
        for field in MANIFEST_ENTRY_FIELDS {
            if is_blank(entry.get(field)) {
                issues.push(
                    ValidationIssue::error(
                        format!("manifest[{}].{}", i, field),
                        format!("Manifest entry {} is missing '{}' field", i + 1, field),
                    )
                    .with_suggestion(format!("Each manifest entry must have a '{}' field", field)),
                );
            }
        }
    }
    issues
}

pub(crate) fn check_codechecker_structure(doc: &Document) -> Vec<ValidationIssue> {
    let Some(codechecker) = non_blank(doc.get("codechecker")) else {
        // Reported by field completeness.
        return Vec::new();
    };

    if !codechecker.is_mapping() {
        return vec![ValidationIssue::error(
            "codechecker",
            format!(
                "Codechecker must be a mapping, got {}",
                type_name(codechecker)
            ),
        )
        .with_suggestion("Structure codechecker as: {name: '...', ORCID: '...'}")];
    }

    if is_blank(codechecker.get("name")) {
        return vec![ValidationIssue::error("codechecker.name", "Codechecker name is missing")
            .with_suggestion("Add name field for codechecker")];
    }

    if is_blank(codechecker.get("ORCID")) {
        return vec![ValidationIssue::warning(
            "codechecker.ORCID",
            "Codechecker ORCID is missing",
        )
        .with_suggestion("Add ORCID field for codechecker")];
    }

    Vec::new()
}

pub(crate) fn check_paper_structure(doc: &Document) -> Vec<ValidationIssue> {
    let Some(paper) = non_blank(doc.get("paper")) else {
        // Reported by field completeness.
        return Vec::new();
    };

    if !paper.is_mapping() {
        return vec![ValidationIssue::error(
            "paper",
            format!("Paper must be a mapping, got {}", type_name(paper)),
        )
        .with_suggestion("Structure paper as: {title: '...', authors: [...], reference: '...'}")];
    }

    let mut issues = Vec::new();
    for field in PAPER_FIELDS {
        if is_blank(paper.get(field)) {
            issues.push(
                ValidationIssue::warning(
                    format!("paper.{}", field),
                    format!("Paper {} is missing", field),
                )
                .with_suggestion(format!("Add paper.{} for complete paper metadata", field)),
            );
        }
    }

    let authors = match paper.get("authors") {
        None | Some(Value::Null) => return issues,
        Some(authors) => authors,
    };
    let Some(authors) = authors.as_sequence() else {
        issues.push(
            ValidationIssue::error(
                "paper.authors",
                format!("Authors must be a list, got {}", type_name(authors)),
            )
            .with_suggestion("Structure authors as list: [{name: '...', ORCID: '...'}, ...]"),
        );
        return issues;
    };

    if authors.is_empty() {
        issues.push(
            ValidationIssue::warning("paper.authors", "Authors list is empty")
                .with_suggestion("Add at least one author with name and ORCID"),
        );
        return issues;
    }

    for (i, author) in authors.iter().enumerate() {
        if !author.is_mapping() {
            issues.push(
                ValidationIssue::error(
                    format!("paper.authors[{}]", i),
                    format!("Author {} must be a mapping", i + 1),
                )
                .with_suggestion("Use format: {name: '...', ORCID: '...'}"),
            );
        } else if is_blank(author.get("name")) {
            issues.push(
                ValidationIssue::error(
                    format!("paper.authors[{}].name", i),
                    format!("Author {} is missing name", i + 1),
                )
                .with_suggestion("Add name field for each author"),
            );
        }
    }

    issues
}

/// Certificate id shape, screened against placeholder ids first.
pub(crate) fn check_certificate_id(doc: &Document) -> Vec<ValidationIssue> {
    let Some(cert) = non_blank(doc.get("certificate")) else {
        return vec![ValidationIssue::warning("certificate", "Certificate ID is not set")
            .with_suggestion(
                "Add certificate ID when assigned (format: YYYY-NNN, e.g., 2023-001)",
            )];
    };

    let Some(cert) = cert.as_str() else {
        return vec![ValidationIssue::error(
            "certificate",
            format!("Certificate ID must be a string, got {}", type_name(cert)),
        )
        .with_suggestion("Use format YYYY-NNN (e.g., 2023-001)")];
    };

    if CERTIFICATE_PLACEHOLDERS.iter().any(|re| re.is_match(cert)) {
        return vec![ValidationIssue::warning(
            "certificate",
            format!("Certificate ID '{}' appears to be a placeholder", cert),
        )
        .with_suggestion("Replace with actual certificate ID (format: YYYY-NNN)")];
    }

    if !CERTIFICATE_FORMAT.is_match(cert) {
        return vec![ValidationIssue::error(
            "certificate",
            format!("Certificate ID '{}' has invalid format", cert),
        )
        .with_suggestion(
            "Use format YYYY-NNN where YYYY is year and NNN is a 3-digit number (e.g., 2023-001)",
        )];
    }

    Vec::new()
}

pub(crate) fn check_report(doc: &Document) -> Vec<ValidationIssue> {
    let Some(report) = non_blank(doc.get("report")) else {
        // Reported by field completeness.
        return Vec::new();
    };

    let Some(report) = report.as_str() else {
        return vec![ValidationIssue::error(
            "report",
            format!("Report must be a string, got {}", type_name(report)),
        )
        .with_suggestion("Provide a DOI or URL for the report")];
    };

    if DOI_PLACEHOLDERS.iter().any(|re| re.is_match(report)) {
        return vec![ValidationIssue::warning(
            "report",
            format!("Report DOI/URL appears to contain placeholder: {}", report),
        )
        .with_suggestion("Replace with actual Zenodo DOI or report URL")];
    }

    let looks_valid = report.starts_with("http://")
        || report.starts_with("https://")
        || report.starts_with("doi:")
        || DOI_FORMAT.is_match(report);
    if !looks_valid {
        return vec![ValidationIssue::warning(
            "report",
            format!("Report does not appear to be a valid URL or DOI: {}", report),
        )
        .with_suggestion("Provide a complete URL (https://...) or DOI (10.xxxx/...)")];
    }

    Vec::new()
}

fn orcid_is_valid(orcid: &Value) -> bool {
    orcid.as_str().is_some_and(|s| ORCID_FORMAT.is_match(s))
}

pub(crate) fn check_orcids(doc: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Some(orcid) = doc
        .get("codechecker")
        .filter(|v| v.is_mapping())
        .and_then(|c| c.get("ORCID"))
        .and_then(|v| non_blank(Some(v)))
    {
        if !orcid_is_valid(orcid) {
            issues.push(
                ValidationIssue::error(
                    "codechecker.ORCID",
                    format!(
                        "Codechecker ORCID '{}' has invalid format",
                        display_value(orcid)
                    ),
                )
                .with_suggestion("Use format: 0000-0000-0000-0000"),
            );
        }
    }

    let authors = doc
        .get("paper")
        .filter(|v| v.is_mapping())
        .and_then(|p| p.get("authors"))
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for (i, author) in authors.iter().enumerate() {
        let Some(orcid) = author
            .as_mapping()
            .and_then(|a| a.get("ORCID"))
            .and_then(|v| non_blank(Some(v)))
        else {
            continue;
        };
        if !orcid_is_valid(orcid) {
            issues.push(
                ValidationIssue::error(
                    format!("paper.authors[{}].ORCID", i),
                    format!(
                        "Author {} ORCID '{}' has invalid format",
                        i + 1,
                        display_value(orcid)
                    ),
                )
                .with_suggestion("Use format: 0000-0000-0000-0000"),
            );
        }
    }

    issues
}

pub(crate) fn check_check_time(doc: &Document) -> Vec<ValidationIssue> {
    let Some(check_time) = non_blank(doc.get("check_time")) else {
        // Reported by field completeness.
        return Vec::new();
    };

    let Some(check_time) = check_time.as_str() else {
        return vec![ValidationIssue::error(
            "check_time",
            format!("check_time must be a string, got {}", type_name(check_time)),
        )
        .with_suggestion("Use ISO 8601 format: YYYY-MM-DDTHH:MM:SS")];
    };

    if parse_iso8601(check_time).is_none() {
        return vec![ValidationIssue::error(
            "check_time",
            format!("check_time '{}' is not in valid ISO 8601 format", check_time),
        )
        .with_suggestion("Use format: YYYY-MM-DDTHH:MM:SS (e.g., 2023-11-15T14:30:00)")];
    }

    Vec::new()
}

/// One aggregated issue for all manifest files missing from `<base>/codecheck/outputs/`.
pub(crate) fn check_manifest_files(doc: &Document, base_dir: &Path) -> Vec<ValidationIssue> {
    if is_blank(doc.get("manifest")) {
        // Reported by field completeness.
        return Vec::new();
    }

    let outputs_dir = base_dir.join(CODECHECK_DIR).join(OUTPUTS_DIR);
    if !outputs_dir.exists() {
        return vec![ValidationIssue::error(
            "manifest",
            format!("Outputs directory does not exist: {}", outputs_dir.display()),
        )
        .with_suggestion("Create codecheck/outputs/ directory and copy manifest files there")];
    }

    let missing: Vec<&str> = doc
        .manifest_entries()
        .iter()
        .filter_map(|entry| entry.as_mapping()?.get("file")?.as_str())
        .filter(|file| !file.is_empty())
        .filter(|file| !outputs_dir.join(file).exists())
        .collect();

    if missing.is_empty() {
        return Vec::new();
    }

    let shown = missing
        .iter()
        .take(MISSING_FILES_SHOWN)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let ellipsis = if missing.len() > MISSING_FILES_SHOWN {
        "..."
    } else {
        ""
    };
    vec![ValidationIssue::error(
        "manifest",
        format!(
            "Missing {} file(s) in outputs/: {}{}",
            missing.len(),
            shown,
            ellipsis
        ),
    )
    .with_suggestion("Copy all manifest files to codecheck/outputs/ directory")]
}

/// Per-check result of the register lookup. `passed` is false only when no record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCheck {
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
}

impl RegisterCheck {
    fn skipped() -> Self {
        Self {
            passed: true,
            issues: Vec::new(),
        }
    }
}

/// Cross-check the certificate against the register.
///
/// Skipped without issues when the certificate is unset, not a string, a placeholder
/// or malformed; those cases belong to [`check_certificate_id`]. A lookup that could
/// not be completed downgrades to a warning and still passes.
pub fn check_register(doc: &Document, lookup: &dyn RegisterLookup) -> RegisterCheck {
    let Some(cert) = doc.get_str("certificate").filter(|c| !c.is_empty()) else {
        return RegisterCheck::skipped();
    };
    if CERTIFICATE_PLACEHOLDERS.iter().any(|re| re.is_match(cert))
        || !CERTIFICATE_FORMAT.is_match(cert)
    {
        return RegisterCheck::skipped();
    }

    match lookup.search(cert) {
        RegisterOutcome::NotFound => RegisterCheck {
            passed: false,
            issues: vec![ValidationIssue::error(
                "certificate",
                format!(
                    "No issue found in codecheckers/register for certificate {}",
                    cert
                ),
            )
            .with_suggestion(format!(
                "Create an issue at {} with certificate {} in the title",
                REGISTER_ISSUES_URL, cert
            ))],
        },
        RegisterOutcome::Matched(record) => {
            let mut issues = Vec::new();
            let html_url = record.html_url.as_deref().unwrap_or(REGISTER_ISSUES_URL);
            if record.is_closed() {
                issues.push(
                    ValidationIssue::warning(
                        "certificate",
                        format!(
                            "Register issue for certificate {} is closed (issue #{})",
                            cert, record.number
                        ),
                    )
                    .with_suggestion(format!(
                        "Consider reopening the issue if the certificate is still being processed: {}",
                        html_url
                    )),
                );
            }
            if record.assignees.is_empty() {
                issues.push(
                    ValidationIssue::warning(
                        "certificate",
                        format!(
                            "Register issue for certificate {} is unassigned (issue #{})",
                            cert, record.number
                        ),
                    )
                    .with_suggestion(format!(
                        "Consider assigning the issue to a codechecker: {}",
                        html_url
                    )),
                );
            }
            RegisterCheck {
                passed: true,
                issues,
            }
        }
        RegisterOutcome::CheckUnavailable { reason } => {
            let issue = match reason {
                UnavailableReason::Timeout => ValidationIssue::warning(
                    "certificate",
                    format!("Timeout while checking register for certificate {}", cert),
                )
                .with_suggestion("Check your internet connection and try again"),
                UnavailableReason::Transport(message) => ValidationIssue::warning(
                    "certificate",
                    format!(
                        "Could not check register for certificate {}: {}",
                        cert, message
                    ),
                )
                .with_suggestion("Verify network connection or check GitHub API status"),
                UnavailableReason::Unexpected(message) => ValidationIssue::warning(
                    "certificate",
                    format!("Unexpected error checking register: {}", message),
                )
                .with_suggestion("Please report this issue"),
            };
            RegisterCheck {
                passed: true,
                issues: vec![issue],
            }
        }
    }
}
