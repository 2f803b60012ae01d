//! Reconciling manifest entries with the files on disk.
//!
//! Files are expected at `<base>/codecheck/outputs/<declared path>`. Every operation
//! reads the entries it is given and nothing else; entries without a `file` are skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CODECHECK_DIR, OUTPUTS_DIR};
use crate::document::Document;
use crate::error::{ManifestError, ManifestResult};
use crate::model::ManifestEntry;

pub mod paths;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A file that was (or in a dry run, would be) copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    /// Declared relative path.
    pub file: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Size of the source file in bytes.
    pub size: u64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyFailure {
    pub file: String,
    pub message: String,
}

/// Result of a copy batch. Failures do not roll back earlier copies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyOutcome {
    pub copied: Vec<CopiedFile>,
    pub failed: Vec<CopyFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Keep the declared directory structure; otherwise copy to the outputs root by file name.
    pub keep_full_path: bool,
    pub overwrite: bool,
    /// Compute everything, write nothing.
    pub dry_run: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            keep_full_path: true,
            overwrite: true,
            dry_run: false,
        }
    }
}

/// Declared size that differs from the file in the outputs directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeMismatch {
    pub file: String,
    pub declared: u64,
    pub actual: u64,
    /// `actual - declared`.
    pub difference: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSummary {
    pub total_files: usize,
    /// Bytes of the entries present under the outputs directory.
    pub total_size: u64,
    pub total_size_mb: f64,
    /// Lowercase extension (with dot, empty for none) to entry count.
    pub file_types: BTreeMap<String, usize>,
    /// Entries with a non-empty comment.
    pub has_comments: usize,
}

/// `(all ok, offending paths in manifest order)`.
pub type FileCheck = (bool, Vec<String>);

/// Manifest operations against one base directory.
#[derive(Debug, Clone)]
pub struct ManifestProcessor {
    entries: Vec<ManifestEntry>,
    base_dir: PathBuf,
    outputs_dir: PathBuf,
}

impl ManifestProcessor {
    pub fn new(entries: Vec<ManifestEntry>, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let outputs_dir = base_dir.join(CODECHECK_DIR).join(OUTPUTS_DIR);
        Self {
            entries,
            base_dir,
            outputs_dir,
        }
    }

    /// Processor over a document's manifest, rooted at the document's directory.
    pub fn from_document(doc: &Document) -> Option<Self> {
        doc.get("manifest")
            .map(|manifest| Self::new(ManifestEntry::collect(manifest), doc.base_dir()))
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn outputs_dir(&self) -> &Path {
        &self.outputs_dir
    }

    fn files(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.file.as_deref().map(|file| (file, entry)))
    }

    /// Check entries exist under `source_dir` (default: the base directory).
    pub fn validate_files_exist(&self, source_dir: Option<&Path>) -> FileCheck {
        let dir = source_dir.unwrap_or(self.base_dir.as_path());
        self.missing_under(dir)
    }

    /// Check entries exist under the outputs directory. A missing outputs directory
    /// reports every entry without probing the files.
    pub fn validate_output_files_exist(&self) -> FileCheck {
        if !self.outputs_dir.exists() {
            let missing: Vec<String> = self.files().map(|(file, _)| file.to_string()).collect();
            return (missing.is_empty(), missing);
        }
        self.missing_under(&self.outputs_dir)
    }

    fn missing_under(&self, dir: &Path) -> FileCheck {
        let missing: Vec<String> = self
            .files()
            .filter(|(file, _)| !dir.join(file).exists())
            .map(|(file, _)| file.to_string())
            .collect();
        (missing.is_empty(), missing)
    }

    /// Actual sizes of the entries present under the outputs (or base) directory.
    /// Absent files are omitted.
    pub fn file_sizes(&self, use_outputs: bool) -> BTreeMap<String, u64> {
        let dir = if use_outputs {
            &self.outputs_dir
        } else {
            &self.base_dir
        };
        self.files()
            .filter_map(|(file, _)| {
                let metadata = std::fs::metadata(dir.join(file)).ok()?;
                Some((file.to_string(), metadata.len()))
            })
            .collect()
    }

    /// Entries whose declared `size` differs from the file in the outputs directory.
    pub fn compare_sizes(&self) -> Vec<SizeMismatch> {
        let actual_sizes = self.file_sizes(true);
        self.files()
            .filter_map(|(file, entry)| {
                let declared = entry.size?;
                let actual = *actual_sizes.get(file)?;
                (actual != declared).then(|| SizeMismatch {
                    file: file.to_string(),
                    declared,
                    actual,
                    difference: actual as i64 - declared as i64,
                })
            })
            .collect()
    }

    /// Copy entries from `source_dir` (default: the base directory) into the outputs tree.
    ///
    /// Missing sources are skipped, as are existing destinations when not overwriting.
    /// Only failing to create the outputs directory aborts the batch.
    pub fn copy_manifest_files(
        &self,
        source_dir: Option<&Path>,
        options: CopyOptions,
    ) -> ManifestResult<CopyOutcome> {
        let source_dir = source_dir.unwrap_or(self.base_dir.as_path());

        if !options.dry_run && !self.outputs_dir.exists() {
            std::fs::create_dir_all(&self.outputs_dir).map_err(|source| {
                ManifestError::CreateOutputs {
                    path: self.outputs_dir.clone(),
                    source,
                }
            })?;
        }

        let mut outcome = CopyOutcome::default();
        for (file, entry) in self.files() {
            let src = source_dir.join(file);
            let Ok(src_metadata) = std::fs::metadata(&src) else {
                debug!(file, "source missing, skipped");
                continue;
            };

            let dst = if options.keep_full_path {
                self.outputs_dir.join(file)
            } else {
                match Path::new(file).file_name() {
                    Some(name) => self.outputs_dir.join(name),
                    None => {
                        outcome.failed.push(CopyFailure {
                            file: file.to_string(),
                            message: "path has no file name".to_string(),
                        });
                        continue;
                    }
                }
            };

            if dst.exists() && !options.overwrite {
                debug!(file, destination = %dst.display(), "destination exists, skipped");
                continue;
            }

            // Copying a file onto itself truncates it before reading.
            if is_same_file(&src, &dst) {
                warn!(file, "source and destination are the same file");
                outcome.failed.push(CopyFailure {
                    file: file.to_string(),
                    message: "source and destination are the same file".to_string(),
                });
                continue;
            }

            if !options.dry_run {
                if let Err(e) = copy_one(&src, &dst) {
                    warn!(file, error = %e, "copy failed");
                    outcome.failed.push(CopyFailure {
                        file: file.to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
                info!(file, destination = %dst.display(), "copied");
            }

            outcome.copied.push(CopiedFile {
                file: file.to_string(),
                source: src,
                destination: dst,
                size: src_metadata.len(),
                comment: entry.comment_or_empty().to_string(),
            });
        }
        Ok(outcome)
    }

    /// Counts, sizes and extensions of the manifest.
    pub fn summary(&self) -> ManifestSummary {
        let total_size: u64 = self.file_sizes(true).values().sum();

        let mut file_types = BTreeMap::new();
        for entry in &self.entries {
            let ext = entry
                .file
                .as_deref()
                .and_then(|file| Path::new(file).extension())
                .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            *file_types.entry(ext).or_insert(0) += 1;
        }

        ManifestSummary {
            total_files: self.entries.len(),
            total_size,
            total_size_mb: round2(total_size as f64 / BYTES_PER_MB),
            file_types,
            has_comments: self
                .entries
                .iter()
                .filter(|entry| entry.comment.as_deref().is_some_and(|c| !c.is_empty()))
                .count(),
        }
    }

    /// Flag declared paths that could land outside the outputs directory.
    ///
    /// `(all safe, unsafe paths in manifest order)`.
    pub fn validate_paths(&self) -> FileCheck {
        let unsafe_paths: Vec<String> = self
            .files()
            .filter(|(file, _)| {
                !paths::is_lexically_safe(file) || !paths::resolves_within(&self.outputs_dir, file)
            })
            .map(|(file, _)| file.to_string())
            .collect();
        (unsafe_paths.is_empty(), unsafe_paths)
    }
}

fn is_same_file(src: &Path, dst: &Path) -> bool {
    match (src.canonicalize(), dst.canonicalize()) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    }
}

fn copy_one(src: &Path, dst: &Path) -> std::io::Result<u64> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dst)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
