//! Markdown and LaTeX sections of a CODECHECK certificate.
//!
//! [`CertificateReport`] ties a loaded document to the validator and the manifest
//! processor and turns their results into text. It decides nothing on its own.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::document::Document;
use crate::error::{ReportError, ReportResult};
use crate::manifest::{CopiedFile, CopyOptions, FileCheck, ManifestProcessor};
use crate::model::{Certificate, Codechecker};
use crate::register::RegisterLookup;
use crate::timestamp::parse_iso8601;
use crate::validation::{format_report, validate, ReportStyle, ValidateOptions, ValidationOutcome};

mod stats;

pub use stats::{describe_csv, stats_table, ColumnStats};

const LOGO: &str = "[![CODECHECK logo](codecheck_logo.png)](https://codecheck.org.uk)";

const ABOUT: &str = "This certificate confirms that the codechecker could independently reproduce the results of a computational analysis given the data and code from a third party. A CODECHECK does not check whether the original computation analysis is correct. However, as all materials required for the reproduction are freely available by following the links in this document, the reader can then study for themselves the code and data.";

/// Extensions handled by [`CertificateReport::latex_figures`] by default.
pub const DEFAULT_FIGURE_EXTENSIONS: &[&str] = &[".pdf", ".eps"];

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOptions {
    /// Validate (without the manifest file check) while opening.
    pub validate: bool,
    /// Fail to open when that validation does not pass.
    pub strict: bool,
}

/// A certificate opened for rendering.
#[derive(Debug)]
pub struct CertificateReport {
    path: PathBuf,
    doc: Document,
    certificate: Result<Certificate, String>,
    processor: Option<ManifestProcessor>,
}

impl CertificateReport {
    /// Load `path`, optionally validating it first.
    pub fn open(
        path: impl AsRef<Path>,
        options: OpenOptions,
        register: Option<&dyn RegisterLookup>,
    ) -> ReportResult<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)?;

        if options.validate {
            let validate_options = ValidateOptions::default()
                .with_check_manifest(false)
                .with_strict(options.strict);
            let outcome = validate(&doc, &validate_options, register);
            if !outcome.passed {
                let report = outcome.report(ReportStyle::Text);
                if options.strict {
                    return Err(ReportError::ValidationFailed {
                        path: path.to_path_buf(),
                        report,
                    });
                }
                warn!(path = %path.display(), "validation did not pass");
            }
        }

        let certificate = Certificate::from_document(&doc)
            .map_err(|issues| format_report(&issues, ReportStyle::Text));
        let processor = ManifestProcessor::from_document(&doc);

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            certificate,
            processor,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The raw parsed document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn manifest(&self) -> Option<&ManifestProcessor> {
        self.processor.as_ref()
    }

    /// The typed certificate, or why it could not be typed.
    pub fn certificate(&self) -> ReportResult<&Certificate> {
        self.certificate
            .as_ref()
            .map_err(|report| ReportError::Invalid {
                report: report.clone(),
            })
    }

    fn certificate_id(&self) -> ReportResult<&str> {
        self.certificate()?
            .certificate
            .as_deref()
            .ok_or(ReportError::MissingField {
                field: "certificate",
            })
    }

    fn check_date(&self) -> ReportResult<NaiveDate> {
        let check_time = self
            .certificate()?
            .check_time
            .as_deref()
            .ok_or(ReportError::MissingField { field: "check_time" })?;
        parse_iso8601(check_time)
            .map(|t| t.date())
            .ok_or_else(|| ReportError::Invalid {
                report: format!("check_time '{}' is not in valid ISO 8601 format", check_time),
            })
    }

    /// Heading with certificate id, report link and logo.
    pub fn title(&self) -> ReportResult<String> {
        let cert = self.certificate()?;
        Ok(format!(
            "# CODECHECK certificate {}{{-}}\n## {} {{-}}\n{}",
            self.certificate_id()?,
            link(&cert.report),
            LOGO
        ))
    }

    /// Item/value table of the general information.
    pub fn summary_table(&self) -> ReportResult<String> {
        let cert = self.certificate()?;
        let paper = cert
            .paper
            .as_ref()
            .ok_or(ReportError::MissingField { field: "paper" })?;
        let title = paper
            .title
            .as_deref()
            .ok_or(ReportError::MissingField {
                field: "paper.title",
            })?;
        let reference = paper
            .reference
            .as_deref()
            .ok_or(ReportError::MissingField {
                field: "paper.reference",
            })?;
        let repository = cert
            .repository
            .as_deref()
            .ok_or(ReportError::MissingField {
                field: "repository",
            })?;
        let summary = cert
            .summary
            .as_deref()
            .ok_or(ReportError::MissingField { field: "summary" })?;
        let authors = paper
            .authors
            .iter()
            .map(|a| name_orcid(&a.name, a.orcid.as_deref()))
            .collect::<Vec<_>>()
            .join(", ");

        let rows = [
            format!("Title | *{}*", title),
            format!("Authors | {}", authors),
            format!("Reference | {}", link(reference)),
            format!("Repository | {}", link(repository)),
            format!("Codechecker | {}", codechecker_line(&cert.codechecker)),
            format!("Date of check | {}", self.check_date()?),
            format!("Summary | {}", summary.trim()),
        ];
        Ok(format!("\nItem | Value\n:--- | :----\n{}", rows.join("\n")))
    }

    /// Name, comment and size of every manifest file, sizes read from the outputs directory.
    pub fn files(&self, remove_dirname: bool) -> ReportResult<String> {
        let cert = self.certificate()?;
        let outputs = self.outputs_dir();
        let rows: Vec<String> = cert
            .files()
            .map(|(file, entry)| {
                let shown = if remove_dirname {
                    Path::new(file)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| file.to_string())
                } else {
                    file.to_string()
                };
                let size = std::fs::metadata(outputs.join(file))
                    .map(|m| m.len().to_string())
                    .unwrap_or_else(|_| "n/a".to_string());
                format!("`{}` | {} | {}", shown, entry.comment_or_empty(), size)
            })
            .collect();

        Ok(format!(
            "\nFile&nbsp;&nbsp;&nbsp; | Comment&nbsp;&nbsp;&nbsp;&nbsp;&nbsp | Size (b)\n\
             :--------------------- | :----------------------------------- | -------:\n{}",
            rows.join("\n")
        ))
    }

    /// The `summary` field.
    pub fn summary(&self) -> ReportResult<String> {
        self.certificate()?
            .summary
            .as_deref()
            .map(|s| s.trim().to_string())
            .ok_or(ReportError::MissingField { field: "summary" })
    }

    /// `Name (YEAR). CODECHECK Certificate ID. Zenodo. [doi](url)`
    pub fn citation(&self) -> ReportResult<String> {
        let cert = self.certificate()?;
        Ok(format!(
            "{} ({}). CODECHECK Certificate {}. Zenodo. {}",
            cert.codechecker.name,
            self.check_date()?.year(),
            self.certificate_id()?,
            link(&cert.report)
        ))
    }

    /// Boilerplate on what a CODECHECK is.
    pub fn about(&self) -> String {
        format!("\n{}", ABOUT)
    }

    pub fn manifest_summary(&self) -> String {
        let Some(processor) = &self.processor else {
            return "*No manifest found*".to_string();
        };
        let summary = processor.summary();

        let mut out = format!(
            "### Manifest Summary\n\n\
             - **Total files**: {}\n\
             - **Total size**: {} bytes ({} MB)\n\
             - **Files with comments**: {}\n\n\
             **File types:**\n",
            summary.total_files,
            group_thousands(summary.total_size),
            format_mb(summary.total_size_mb),
            summary.has_comments
        );
        for (ext, count) in &summary.file_types {
            let shown = if ext.is_empty() {
                "(no extension)"
            } else {
                ext.as_str()
            };
            out.push_str(&format!("- `{}`: {} file(s)\n", shown, count));
        }
        out
    }

    /// Copy manifest files into the outputs tree and list what was copied.
    ///
    /// `source_dir` defaults to the configuration file's directory.
    pub fn copy_manifest_files(
        &self,
        source_dir: Option<&Path>,
        options: CopyOptions,
    ) -> ReportResult<String> {
        let Some(processor) = &self.processor else {
            return Ok("*No manifest found*".to_string());
        };
        let outcome = processor.copy_manifest_files(source_dir, options)?;
        for failure in &outcome.failed {
            warn!(file = %failure.file, error = %failure.message, "manifest file not copied");
        }
        Ok(copied_files(&outcome.copied))
    }

    /// One section per `.csv` manifest file with column statistics.
    pub fn csv_files(&self) -> ReportResult<String> {
        let cert = self.certificate()?;
        let outputs = self.outputs_dir();

        let mut sections = Vec::new();
        for (file, entry) in cert.files().filter(|(file, _)| file.ends_with(".csv")) {
            let stats = describe_csv(&outputs.join(file))?;
            let comment = match entry.comment.as_deref() {
                Some(c) if !c.is_empty() => format!("Author comment: *{}*", c),
                _ => " ".to_string(),
            };
            sections.push(format!(
                "### `{}` {{-}}\n{}\n\n**Column summary statistics:**\n\n{}\n",
                file,
                comment,
                stats_table(&stats)
            ));
        }
        Ok(sections.join("\n\n"))
    }

    /// LaTeX figure blocks for manifest files with one of `extensions` (lowercase, with dot).
    pub fn latex_figures(&self, extensions: &[&str]) -> ReportResult<String> {
        let cert = self.certificate()?;
        let mut lines = Vec::new();
        for (file, entry) in cert.files() {
            let ext = Path::new(file)
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            if !extensions.contains(&ext.as_str()) {
                continue;
            }
            lines.push(format!(
                "\\begin{{figure}}\\texttt{{{}}}.\\\\",
                file.replace('_', "\\_")
            ));
            lines.push(format!(
                "Author comment: \\emph{{{}}}\\\\",
                entry.comment_or_empty()
            ));
            lines.push(format!("\\includegraphics{{outputs/{}}}", file));
            lines.push("\\end{figure}".to_string());
            lines.push(String::new());
        }
        Ok(lines.join("\n"))
    }

    /// Validate with the given options. `base_dir` defaults to the configuration file's directory.
    pub fn validate(
        &self,
        options: &ValidateOptions,
        register: Option<&dyn RegisterLookup>,
    ) -> ValidationOutcome {
        validate(&self.doc, options, register)
    }

    /// Validate and render the issues.
    pub fn validation_report(
        &self,
        options: &ValidateOptions,
        register: Option<&dyn RegisterLookup>,
        style: ReportStyle,
    ) -> String {
        self.validate(options, register).report(style)
    }

    /// Whether every manifest file is under the outputs directory. No manifest fails.
    pub fn validate_manifest_files(&self) -> FileCheck {
        match &self.processor {
            Some(processor) => processor.validate_output_files_exist(),
            None => (false, Vec::new()),
        }
    }

    fn outputs_dir(&self) -> PathBuf {
        match &self.processor {
            Some(processor) => processor.outputs_dir().to_path_buf(),
            None => ManifestProcessor::new(Vec::new(), self.doc.base_dir())
                .outputs_dir()
                .to_path_buf(),
        }
    }
}

/// List of copied files with sizes in KB.
pub fn copied_files(copied: &[CopiedFile]) -> String {
    if copied.is_empty() {
        return "*No files copied*".to_string();
    }
    let mut out = format!("### Copied {} file(s)\n\n", copied.len());
    for entry in copied {
        out.push_str(&format!(
            "- `{}` ({:.1} KB)\n",
            entry.file,
            entry.size as f64 / 1024.0
        ));
    }
    out
}

/// `[host/path](url)`: the link text drops the scheme.
fn link(url: &str) -> String {
    let text = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    format!("[{}]({})", text, url)
}

fn name_orcid(name: &str, orcid: Option<&str>) -> String {
    match orcid {
        Some(orcid) => format!(
            "{} (ORCID: [{}](https://orcid.org/{}))",
            name, orcid, orcid
        ),
        None => name.to_string(),
    }
}

fn codechecker_line(codechecker: &Codechecker) -> String {
    name_orcid(&codechecker.name, codechecker.orcid.as_deref())
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Two-decimal megabytes as a float literal: `0.0`, `1.5`, `12.34`.
fn format_mb(mb: f64) -> String {
    let s = format!("{:.2}", mb);
    let trimmed = s.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}
