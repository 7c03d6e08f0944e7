//! Catalog file schema and loading.
//!
//! A catalog is a YAML document with a single `error` list:
//!
//! ```yaml
//! error:
//!   - key: MissingParameter
//!     code: MissingParameter
//!     category: validation
//!     severity: warning
//!     description: a required parameter was not supplied
//!     message:
//!       en: "Missing Parameter: %s"
//!       cn: "缺少参数: %s"
//! ```
//!
//! Only `key` and `code` are required; everything else has a default that
//! validation or the runtime fills in.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;

/// Top-level shape of a catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Declared error entries, in file order.
    #[serde(default)]
    pub error: Vec<CatalogEntry>,
}

/// One declared error kind, as written in YAML.
///
/// Unknown fields are rejected so that typos like `mesage:` fail loudly
/// instead of silently dropping translations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Unique name, referenced by raising code.
    pub key: String,

    /// Stable machine-facing identifier.
    pub code: String,

    /// Grouping label; defaults to `general`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Severity token; defaults to `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Human-oriented summary used for generated documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Message templates keyed by language tag.
    #[serde(default)]
    pub message: BTreeMap<String, String>,
}

/// Reads and deserializes one catalog file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, CodegenError> {
    let text = fs::read_to_string(path).map_err(|source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: CatalogFile = serde_yaml::from_str(&text).map_err(|source| CodegenError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = path.display().to_string(), entries = file.error.len(); "Loaded catalog");
    Ok(file.error)
}
