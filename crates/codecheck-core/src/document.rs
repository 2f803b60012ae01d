//! Loading `codecheck.yml` into an untyped YAML tree.
//!
//! The tree is kept as-is: shape checks belong to the validation rules, and
//! [`crate::model::Certificate::from_document`] is the only place that turns it
//! into typed records.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{DocumentError, DocumentResult};

/// A parsed configuration document. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct Document {
    root: Mapping,
    path: Option<PathBuf>,
}

impl Document {
    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading configuration");

        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DocumentError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DocumentError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut doc = Self::from_yaml_str(&content)?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Parse a document held in memory.
    pub fn from_yaml_str(content: &str) -> DocumentResult<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| DocumentError::Syntax {
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed tree.
    pub fn from_value(value: Value) -> DocumentResult<Self> {
        match value {
            Value::Null => Err(DocumentError::Empty),
            Value::Mapping(root) => Ok(Self { root, path: None }),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            other => Err(DocumentError::NotMapping {
                found: type_name(&other),
            }),
        }
    }

    /// Top-level value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Top-level string value for `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The path this document was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory containing the configuration file, `.` for in-memory documents.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// The manifest node when it is a sequence.
    pub fn manifest_entries(&self) -> &[Value] {
        self.get("manifest")
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// YAML-flavoured name of a node's type, used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Whether a node counts as unset: missing, null, `false`, zero, empty string or empty collection.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Sequence(s)) => s.is_empty(),
        Some(Value::Mapping(m)) => m.is_empty(),
        Some(Value::Tagged(t)) => is_blank(Some(&t.value)),
    }
}

/// `value` unless it is blank.
pub fn non_blank(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_blank(Some(*v)))
}

/// Render a scalar the way it appears in the document, for messages.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| type_name(other).to_string()),
    }
}
