//! The runtime error value.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::definition::Definition;
use crate::template;

/// A single error occurrence, optionally backed by a [`Definition`].
///
/// A fault carries the identity of its error class (key and code), the
/// positional arguments for message rendering, an open metadata bag, an
/// optional wrapped cause, and its creation timestamp. When it is
/// constructed from a definition, key and code are copied from the
/// definition and never diverge from it.
///
/// Faults are immutable values: every modifier returns a new instance and
/// leaves the receiver untouched, so a fault can be shared across threads
/// while variants of it are derived.
///
/// # Example
///
/// ```
/// use klaxon::Fault;
///
/// let base = Fault::new("MissingParameter");
/// let bound = base.args(["UserId"]).with_meta("request_id", "r-17");
///
/// assert!(base.arguments().is_empty());
/// assert_eq!(bound.arguments(), ["UserId"]);
/// assert!(base.is(&bound));
/// ```
#[derive(Debug, Clone)]
pub struct Fault {
    key: String,
    code: String,
    args: Vec<String>,
    metadata: BTreeMap<String, Value>,
    cause: Option<Arc<dyn StdError + Send + Sync>>,
    time: DateTime<Utc>,
    definition: Option<Arc<Definition>>,
}

impl Fault {
    /// Creates a fault backed by a catalog definition.
    pub fn from_definition(definition: Arc<Definition>) -> Self {
        Self {
            key: definition.key().to_string(),
            code: definition.code().to_string(),
            args: Vec::new(),
            metadata: BTreeMap::new(),
            cause: None,
            time: Utc::now(),
            definition: Some(definition),
        }
    }

    /// Creates a fault from a bare key, with no definition attached.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: String::new(),
            args: Vec::new(),
            metadata: BTreeMap::new(),
            cause: None,
            time: Utc::now(),
            definition: None,
        }
    }

    /// Creates a fault from a bare key wrapping an existing error.
    pub fn wrap(key: impl Into<String>, cause: impl StdError + Send + Sync + 'static) -> Self {
        Self::new(key).caused_by(cause)
    }

    /// Returns a copy carrying `args` as its argument list.
    ///
    /// Key, code, definition linkage, metadata, and cause are preserved.
    #[must_use]
    pub fn args<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fault = self.clone();
        fault.args = args.into_iter().map(Into::into).collect();
        fault
    }

    /// Returns a copy with one metadata entry attached.
    ///
    /// Safe to call repeatedly; the last value wins for a repeated key.
    #[must_use]
    pub fn with_meta(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fault = self.clone();
        fault.metadata.insert(key.into(), value.into());
        fault
    }

    /// Returns a copy wrapping `cause`.
    #[must_use]
    pub fn caused_by(&self, cause: impl StdError + Send + Sync + 'static) -> Self {
        let mut fault = self.clone();
        fault.cause = Some(Arc::new(cause));
        fault
    }

    /// The error-class key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The externally facing code; empty for bare faults.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Positional arguments bound for message rendering.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// The metadata bag.
    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// When the fault was created.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// The owning definition, if the fault was built from one.
    pub fn definition(&self) -> Option<&Arc<Definition>> {
        self.definition.as_ref()
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Reports whether `self` and `other` denote the same error class.
    ///
    /// Identity is the key/code pair; arguments, metadata, cause, and
    /// timestamps never affect it.
    pub fn is(&self, other: &Fault) -> bool {
        self.key == other.key && self.code == other.code
    }
}

/// Renders the fault's default string form.
///
/// With a definition attached: the English (or first available) message,
/// argument-substituted when arguments are bound, otherwise annotated with
/// the code. Without one: the cause's rendering, or the key with any raw
/// arguments.
impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(def) = &self.definition {
            let message = def
                .message("en")
                .or_else(|| def.messages().values().next().map(String::as_str))
                .unwrap_or_default();
            if self.args.is_empty() {
                return write!(f, "Code:{}, Message: {}", self.code, message);
            }
            return f.write_str(&template::render(message, &self.args));
        }
        if let Some(cause) = &self.cause {
            return fmt::Display::fmt(cause, f);
        }
        if self.args.is_empty() {
            f.write_str(&self.key)
        } else {
            write!(f, "{}: {:?}", self.key, self.args)
        }
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}
