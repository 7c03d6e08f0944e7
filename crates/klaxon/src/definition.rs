//! Catalog definitions and severity levels.
//!
//! A [`Definition`] is the declarative record for one error class: a stable
//! key, an externally facing code, classification fields, and message
//! templates keyed by language tag. Definitions are usually produced by the
//! catalog generator and registered at startup, but they can also be built
//! programmatically with the `with_*` methods.
//!
//! # Example
//!
//! ```
//! use klaxon::{Definition, Severity};
//!
//! let def = Definition::new("MissingParameter", "MissingParameter")
//!     .with_category("validation")
//!     .with_severity(Severity::Warning)
//!     .with_message("en", "Missing Parameter: %s")
//!     .with_message("cn", "缺少参数: %s");
//!
//! assert_eq!(def.message("en"), Some("Missing Parameter: %s"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The severity level of a cataloged error class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// An expected, recoverable condition.
    Warning,

    /// A standard failure.
    #[default]
    Error,

    /// A failure that requires immediate attention.
    Critical,
}

impl Severity {
    /// Returns the lowercase token used in catalogs and rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Returns `true` for [`Severity::Critical`].
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a severity token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}`, expected one of: warning, error, critical")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Parses a severity token, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// A declarative catalog entry describing one error class.
///
/// The key is the globally unique identifier within a registry; the code is
/// the externally facing value and may repeat across keys. Message templates
/// are stored per lowercase language tag and may contain positional format
/// directives (see [`crate::template`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    key: String,
    code: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    description: String,
    #[serde(default)]
    messages: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
}

impl Definition {
    /// Creates a definition with the given key and code.
    ///
    /// Category, severity, description, and messages start at their
    /// defaults and are filled with the `with_*` methods.
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            category: String::new(),
            severity: Severity::default(),
            description: String::new(),
            messages: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a message template for a language tag.
    ///
    /// The tag is lowercased, so `"EN"` and `"en"` address the same entry.
    pub fn with_message(mut self, lang: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(lang.into().to_lowercase(), template.into());
        self
    }

    /// Adds one metadata entry.
    ///
    /// Metadata is an open bag carried through catalog round-trips; the
    /// runtime render path never consults it.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The unique identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The externally facing code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The category, empty until defaulted by registration.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The severity level.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// All message templates, keyed by lowercase language tag.
    pub fn messages(&self) -> &BTreeMap<String, String> {
        &self.messages
    }

    /// The message template for `lang`, matching case-insensitively.
    pub fn message(&self, lang: &str) -> Option<&str> {
        self.messages.get(&lang.to_lowercase()).map(String::as_str)
    }

    /// The metadata bag.
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Fills registration-time defaults: an empty category becomes
    /// `"general"`.
    pub(crate) fn fill_defaults(&mut self) {
        if self.category.is_empty() {
            self.category = "general".to_string();
        }
    }
}
