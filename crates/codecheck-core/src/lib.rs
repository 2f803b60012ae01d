//! Validation and manifest handling for CODECHECK certificates.
//!
//! A certificate is described by a `codecheck.yml` file. This crate provides:
//!
//! - Loading the file into an untyped tree and a typed [`Certificate`]
//! - Rule-based validation with error/warning/info issues and strict mode
//! - An optional cross-check against the CODECHECK register
//! - Manifest file operations: existence, sizes, copying, path safety
//! - Markdown/LaTeX rendering of certificate sections
//!
//! # Quick Start
//!
//! ```no_run
//! use codecheck_core::{validate_path, ReportStyle, ValidateOptions};
//!
//! let outcome = validate_path("codecheck.yml", &ValidateOptions::default(), None);
//! println!("{}", outcome.report(ReportStyle::Text));
//! std::process::exit(if outcome.passed { 0 } else { 1 });
//! ```
//!
//! # Register lookup
//!
//! Validation only checks the register when given a [`RegisterLookup`]. The blocking
//! [`RegisterClient`] is configured from:
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `CODECHECK_REGISTER_URL` | Issue listing endpoint (default: `https://api.github.com/repos/codecheckers/register/issues`) |
//! | `CODECHECK_REGISTER_TOKEN` | Bearer token |
//! | `CODECHECK_REGISTER_TIMEOUT` | Request timeout in seconds (default: 10) |

pub mod config;
pub mod document;
pub mod error;
pub mod manifest;
pub mod model;
pub mod register;
pub mod render;
pub mod timestamp;
pub mod validation;

// Re-export main types
pub use document::Document;
pub use error::{
    DocumentError, DocumentResult, ManifestError, ManifestResult, RegisterError, RegisterResult,
    ReportError, ReportResult,
};
pub use manifest::{
    CopiedFile, CopyFailure, CopyOptions, CopyOutcome, ManifestProcessor, ManifestSummary,
    SizeMismatch,
};
pub use model::{Author, Certificate, Codechecker, ManifestEntry, Paper};
pub use register::{
    RegisterClient, RegisterConfig, RegisterIssue, RegisterLookup, RegisterOutcome,
    UnavailableReason,
};
pub use render::{CertificateReport, OpenOptions};
pub use validation::{
    format_report, validate, validate_path, Level, ReportStyle, ValidateOptions,
    ValidationIssue, ValidationOutcome,
};
