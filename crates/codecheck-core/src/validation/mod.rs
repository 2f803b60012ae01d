//! Rule-based validation of `codecheck.yml`.
//!
//! A run is a pure function of the document, the options and (optionally) a register
//! lookup:
//!
//! 1. parse (done by [`validate_path`]; failure short-circuits with exactly one error)
//! 2. field completeness
//! 3. structure: manifest, codechecker, paper
//! 4. formats: certificate id, report DOI/URL, ORCIDs, check time
//! 5. manifest files present under `codecheck/outputs/` (when enabled)
//! 6. register record for the certificate (when a lookup is supplied)
//!
//! Issues keep check order. Pass/fail is decided from the finished list, so the same
//! issues can be read strictly or leniently.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::document::Document;
use crate::register::RegisterLookup;

mod placeholder;
mod report;
pub mod rules;

pub use placeholder::{field_present, is_placeholder};
pub use report::{format_report, ReportStyle};
pub use rules::{check_register, RegisterCheck, RuleContext, RuleDefinition, RULES};

/// Issue severity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Info => write!(f, "info"),
        }
    }
}

/// A single finding. `field` is a dotted path such as `paper.authors[2].ORCID`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub level: Level,
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(level: Level, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Error, field, message)
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, field, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.level.to_string().to_uppercase(),
            self.field,
            self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  → Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Options for a validation run.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Check that manifest files exist under `codecheck/outputs/`.
    pub check_manifest: bool,
    /// Treat warnings as failures.
    pub strict: bool,
    /// Directory containing `codecheck/`. Defaults to the configuration file's directory.
    pub base_dir: Option<PathBuf>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            check_manifest: true,
            strict: false,
            base_dir: None,
        }
    }
}

impl ValidateOptions {
    pub fn with_check_manifest(mut self, check: bool) -> Self {
        self.check_manifest = check;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct IssueSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// Result of a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    fn decide(issues: Vec<ValidationIssue>, strict: bool) -> Self {
        let passed = passes(&issues, strict);
        Self { passed, issues }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.at(Level::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.at(Level::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.at(Level::Info)
    }

    fn at(&self, level: Level) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.level == level)
    }

    pub fn summary(&self) -> IssueSummary {
        summarize(&self.issues)
    }

    /// Render the issues in the given style.
    pub fn report(&self, style: ReportStyle) -> String {
        format_report(&self.issues, style)
    }
}

/// Count issues per level.
pub fn summarize(issues: &[ValidationIssue]) -> IssueSummary {
    let mut summary = IssueSummary {
        total: issues.len(),
        ..IssueSummary::default()
    };
    for issue in issues {
        match issue.level {
            Level::Error => summary.errors += 1,
            Level::Warning => summary.warnings += 1,
            Level::Info => summary.infos += 1,
        }
    }
    summary
}

/// No errors; in strict mode, no warnings either.
pub fn passes(issues: &[ValidationIssue], strict: bool) -> bool {
    let summary = summarize(issues);
    if strict {
        summary.errors == 0 && summary.warnings == 0
    } else {
        summary.errors == 0
    }
}

/// Run every rule against an already-parsed document.
pub fn validate(
    doc: &Document,
    options: &ValidateOptions,
    register: Option<&dyn RegisterLookup>,
) -> ValidationOutcome {
    let base_dir = options
        .base_dir
        .clone()
        .unwrap_or_else(|| doc.base_dir());
    let ctx = RuleContext {
        doc,
        base_dir: &base_dir,
        check_manifest: options.check_manifest,
        register,
    };

    let mut issues = Vec::new();
    for rule in RULES {
        let found = (rule.check)(&ctx);
        debug!(rule = rule.id, issues = found.len(), "rule evaluated");
        issues.extend(found);
    }

    ValidationOutcome::decide(issues, options.strict)
}

/// Load `path` and validate it. A parse failure is the only issue of a failed run.
pub fn validate_path(
    path: impl AsRef<Path>,
    options: &ValidateOptions,
    register: Option<&dyn RegisterLookup>,
) -> ValidationOutcome {
    match Document::load(path) {
        Ok(doc) => validate(&doc, options, register),
        Err(err) => ValidationOutcome {
            passed: false,
            issues: vec![err.to_issue()],
        },
    }
}
