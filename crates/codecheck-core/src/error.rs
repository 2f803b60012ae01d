//! Error types for loading, manifest handling, register lookups and reporting.

use std::path::PathBuf;

use crate::validation::{Level, ValidationIssue};

/// Fatal failures while loading `codecheck.yml`. Any of these aborts a validation run.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Could not read configuration file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid YAML.
    #[error("Invalid YAML syntax: {message}")]
    Syntax { message: String },

    /// The document parsed to nothing.
    #[error("YAML file is empty or contains only null value")]
    Empty,

    /// The top level is a sequence or scalar instead of a mapping.
    #[error("Top-level YAML value must be a mapping, got {found}")]
    NotMapping { found: &'static str },
}

impl DocumentError {
    /// The single error-level issue a failed parse contributes to a validation run.
    pub fn to_issue(&self) -> ValidationIssue {
        let (field, suggestion) = match self {
            Self::NotFound { .. } => (
                "file",
                "Ensure codecheck.yml exists in the correct location",
            ),
            Self::Unreadable { .. } => ("file", "Check the file permissions of codecheck.yml"),
            Self::Syntax { .. } => (
                "syntax",
                "Check YAML formatting, indentation, and special characters",
            ),
            Self::Empty => ("syntax", "Add valid CODECHECK configuration to the file"),
            Self::NotMapping { .. } => (
                "syntax",
                "Structure codecheck.yml as a mapping of top-level fields",
            ),
        };
        ValidationIssue::new(Level::Error, field, self.to_string()).with_suggestion(suggestion)
    }
}

/// Result type for document loading.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Manifest file-management errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The outputs directory could not be created.
    #[error("failed to create outputs directory {}: {source}", path.display())]
    CreateOutputs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Register lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection, TLS or other transport-level failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// The register answered with a non-success status.
    #[error("register returned HTTP {status}")]
    Status { status: u16 },

    /// The response body was not the expected issue listing.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The HTTP client could not be built.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RegisterError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the failure happened at the request level (as opposed to decoding).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Network { .. } | Self::Status { .. }
        )
    }
}

/// Result type for register operations.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// Errors raised by the reporting facade.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Strict validation on open failed; carries the plain-text report.
    #[error("Validation failed for {}:\n{report}", path.display())]
    ValidationFailed { path: PathBuf, report: String },

    /// The certificate does not have the shape required for rendering.
    #[error("certificate is not renderable:\n{report}")]
    Invalid { report: String },

    /// A section needs a field the certificate does not define.
    #[error("field '{field}' is required to render this section")]
    MissingField { field: &'static str },

    /// A CSV output could not be read or parsed.
    #[error("failed to read CSV {}: {message}", path.display())]
    Csv { path: PathBuf, message: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Result type for the reporting facade.
pub type ReportResult<T> = Result<T, ReportError>;
