//! Typed certificate records.
//!
//! [`Certificate::from_document`] is the one place an untyped [`Document`] becomes a
//! record: it runs the shape rules first and only deserializes a tree that passed them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::config::MANDATORY_FIELDS;
use crate::document::Document;
use crate::validation::rules::{
    check_codechecker_structure, check_manifest_structure, check_paper_structure,
};
use crate::validation::{field_present, Level, ValidationIssue};

/// A fully shaped `codecheck.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub certificate: Option<String>,
    pub report: String,
    #[serde(default)]
    pub paper: Option<Paper>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub check_time: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    pub codechecker: Codechecker,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manifest: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(rename = "ORCID", default)]
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Codechecker {
    pub name: String,
    #[serde(rename = "ORCID", default)]
    pub orcid: Option<String>,
}

/// One declared output file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Declared size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ManifestEntry {
    /// Read the entries of a manifest node without failing.
    ///
    /// Non-mapping entries are dropped. A `file` or `comment` that is not a non-empty
    /// string is treated as absent, as is a `size` that is not a non-negative integer.
    pub fn collect(manifest: &Value) -> Vec<ManifestEntry> {
        let Some(entries) = manifest.as_sequence() else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(Value::as_mapping)
            .map(|entry| {
                let text = |key: &str| {
                    entry
                        .get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                ManifestEntry {
                    file: text("file"),
                    comment: text("comment"),
                    size: entry.get("size").and_then(Value::as_u64),
                }
            })
            .collect()
    }

    /// `comment`, or empty.
    pub fn comment_or_empty(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

impl Certificate {
    /// Shape-check `doc` and deserialize it.
    ///
    /// On failure returns the error-level issues that prevented typing, in rule order.
    pub fn from_document(doc: &Document) -> Result<Self, Vec<ValidationIssue>> {
        let mut errors: Vec<ValidationIssue> = MANDATORY_FIELDS
            .iter()
            .filter(|field| !field_present(doc, field))
            .map(|field| {
                ValidationIssue::error(
                    *field,
                    format!("Mandatory field '{}' is missing or empty", field),
                )
            })
            .collect();
        errors.extend(
            check_manifest_structure(doc)
                .into_iter()
                .chain(check_codechecker_structure(doc))
                .chain(check_paper_structure(doc))
                .filter(|issue| issue.level == Level::Error),
        );
        if !errors.is_empty() {
            return Err(errors);
        }

        serde_yaml::from_value(Value::Mapping(doc.root().clone())).map_err(|e| {
            vec![ValidationIssue::error(
                "document",
                format!("Document does not match the certificate schema: {}", e),
            )]
        })
    }

    /// Manifest entries that declare a file.
    pub fn files(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.manifest
            .iter()
            .filter_map(|entry| entry.file.as_deref().map(|file| (file, entry)))
    }
}
