//! Error types for catalog loading, validation, and code generation.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A single problem found while validating catalog entries.
///
/// Issues carry the originating file so that aggregated reports over many
/// catalogs stay attributable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    /// An entry with no key at all. `index` is the 1-based position in the
    /// file, since there is no key to point at.
    #[error("`{file}`: entry #{index} has an empty key")]
    EmptyKey { file: String, index: usize },

    /// A keyed entry missing its code.
    #[error("`{file}`: definition `{key}` has an empty code")]
    EmptyCode { file: String, key: String },

    /// A key that cannot anchor a generated identifier.
    #[error("`{file}`: key `{key}` must start with a letter")]
    InvalidKey { file: String, key: String },

    /// A severity token outside the known set.
    #[error("`{file}`: definition `{key}` has unknown severity `{severity}`")]
    UnknownSeverity {
        file: String,
        key: String,
        severity: String,
    },

    /// The same key declared twice, possibly across files.
    #[error("`{file}`: definition `{key}` already declared in `{first_file}`")]
    DuplicateKey {
        file: String,
        key: String,
        first_file: String,
    },

    /// Two distinct keys that lower to the same generated function name.
    #[error("`{file}`: keys `{key}` and `{other}` collide on generated name")]
    IdentifierCollision {
        file: String,
        key: String,
        other: String,
    },

    /// An entry with no message in any language.
    #[error("`{file}`: definition `{key}` has no messages")]
    NoMessages { file: String, key: String },

    /// Two input files that would emit the same module file.
    #[error("`{file}` and `{other}` both generate module `{base}`")]
    DuplicateModule {
        file: String,
        other: String,
        base: String,
    },
}

/// Validation failure carrying every issue found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<CatalogIssue>,
}

impl ValidationError {
    /// Creates a validation error from collected issues.
    pub fn new(issues: Vec<CatalogIssue>) -> Self {
        Self { issues }
    }

    /// All issues found during validation.
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.issues.first() {
            write!(f, "{first}")?;
            let rest = self.issues.len() - 1;
            if rest > 0 {
                write!(f, " (+{rest} more)")?;
            }
        } else {
            write!(f, "catalog validation failed")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<CatalogIssue> for ValidationError {
    fn from(issue: CatalogIssue) -> Self {
        Self::new(vec![issue])
    }
}

impl From<Vec<CatalogIssue>> for ValidationError {
    fn from(issues: Vec<CatalogIssue>) -> Self {
        Self::new(issues)
    }
}

/// Accumulates issues across catalogs so a run reports everything at once.
#[derive(Debug, Default)]
pub(crate) struct IssueCollector {
    issues: Vec<CatalogIssue>,
}

impl IssueCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&mut self, issue: CatalogIssue) {
        self.issues.push(issue);
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.issues))
        }
    }
}

/// Errors produced while turning catalogs into source code.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// Reading or writing a file failed.
    #[error("failed to access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A catalog file did not deserialize.
    #[error("`{}` is not a valid catalog", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// One or more entries failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The emitted source did not pass its own sanity check.
    #[error("generated source failed self-check: {0}")]
    Generation(String),
}
