//! Output rendering for faults.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::Context;
use crate::fault::Fault;
use crate::localize::Localizer;

/// Output shape selected through [`FormatOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    /// An insertion-ordered key/value map.
    #[default]
    Structured,

    /// The structured map serialized as pretty-printed JSON.
    Json,

    /// Concatenated human-readable lines.
    Text,
}

/// Error returned when a format mode token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format `{0}`, expected one of: structured, json, text")]
pub struct ParseFormatModeError(String);

impl FromStr for FormatMode {
    type Err = ParseFormatModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structured" => Ok(FormatMode::Structured),
            "json" => Ok(FormatMode::Json),
            "text" => Ok(FormatMode::Text),
            _ => Err(ParseFormatModeError(s.to_string())),
        }
    }
}

/// Rendering configuration.
///
/// The defaults emit everything: metadata and cause included, structured
/// mode, language taken from the per-call [`Context`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Emit the metadata block when the fault carries metadata.
    pub include_metadata: bool,

    /// Recurse into the wrapped cause.
    pub include_cause: bool,

    /// Target language; `None` defers to the context hint.
    pub language: Option<String>,

    /// Output shape.
    pub format: FormatMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            include_cause: true,
            language: None,
            format: FormatMode::Structured,
        }
    }
}

impl FormatOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output shape.
    #[must_use]
    pub fn with_format(mut self, format: FormatMode) -> Self {
        self.format = format;
        self
    }

    /// Sets a fixed target language, overriding the context hint.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Enables or disables the metadata block.
    #[must_use]
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Enables or disables cause recursion.
    #[must_use]
    pub fn with_cause(mut self, include: bool) -> Self {
        self.include_cause = include;
        self
    }
}

/// A rendered fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Insertion-ordered field map.
    Structured(Map<String, Value>),

    /// Pretty-printed JSON document.
    Json(String),

    /// Line-oriented text.
    Text(String),
}

impl Rendered {
    /// The field map, when rendered in structured mode.
    pub fn as_structured(&self) -> Option<&Map<String, Value>> {
        match self {
            Rendered::Structured(map) => Some(map),
            _ => None,
        }
    }

    /// The JSON document, when rendered in JSON mode.
    pub fn as_json(&self) -> Option<&str> {
        match self {
            Rendered::Json(doc) => Some(doc),
            _ => None,
        }
    }

    /// The text, when rendered in text mode.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Structured(map) => {
                let doc = serde_json::to_string(map)
                    .expect("serializing an in-memory map is infallible");
                f.write_str(&doc)
            }
            Rendered::Json(doc) => f.write_str(doc),
            Rendered::Text(text) => f.write_str(text),
        }
    }
}

/// Renders a [`Fault`] into its final output shape.
///
/// Formatting is total: unknown languages and missing messages degrade
/// through the localizer's fallback chain, and every mode renders something
/// for every fault.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use klaxon::{Context, Definition, Fault, Formatter, Localizer, Registry};
///
/// let registry = Arc::new(Registry::new());
/// registry
///     .register(Definition::new("NotFound", "E404").with_message("en", "Not Found"))
///     .unwrap();
///
/// let formatter = Formatter::new(Localizer::new(registry));
/// let rendered = formatter.format(&Context::new(), &Fault::new("NotFound"));
///
/// let map = rendered.as_structured().unwrap();
/// assert_eq!(map["code"], "E404");
/// assert_eq!(map["message"], "Not Found");
/// ```
#[derive(Debug, Clone)]
pub struct Formatter {
    localizer: Localizer,
    options: FormatOptions,
}

impl Formatter {
    /// Creates a formatter with default options.
    pub fn new(localizer: Localizer) -> Self {
        Self {
            localizer,
            options: FormatOptions::default(),
        }
    }

    /// Replaces the formatter's default options.
    #[must_use]
    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    /// The formatter's default options.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Renders with the formatter's own options.
    pub fn format(&self, cx: &Context, fault: &Fault) -> Rendered {
        self.format_with(cx, fault, &self.options)
    }

    /// Renders with explicit options.
    pub fn format_with(&self, cx: &Context, fault: &Fault, options: &FormatOptions) -> Rendered {
        let language = options.language.as_deref().unwrap_or_else(|| cx.language());
        debug!(key = fault.key(), language = language, format:? = options.format; "Formatting fault");

        match options.format {
            FormatMode::Structured => Rendered::Structured(self.structured(language, fault, options)),
            FormatMode::Json => {
                let map = self.structured(language, fault, options);
                let doc = serde_json::to_string_pretty(&Value::Object(map))
                    .expect("serializing an in-memory map is infallible");
                Rendered::Json(doc)
            }
            FormatMode::Text => Rendered::Text(self.text(language, fault, options)),
        }
    }

    fn structured(&self, language: &str, fault: &Fault, options: &FormatOptions) -> Map<String, Value> {
        let def = self.localizer.resolve_definition(fault);

        let mut map = Map::new();
        map.insert("key".to_string(), Value::from(fault.key()));
        map.insert(
            "code".to_string(),
            Value::from(Self::effective_code(fault, def.as_deref())),
        );
        map.insert(
            "message".to_string(),
            Value::from(self.localizer.localize_with_language(language, fault)),
        );
        map.insert("time".to_string(), Value::from(fault.time().to_rfc3339()));

        if options.include_metadata && !fault.metadata().is_empty() {
            let meta: Map<String, Value> = fault
                .metadata()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            map.insert("metadata".to_string(), Value::Object(meta));
        }

        if options.include_cause {
            if let Some(cause) = fault.cause() {
                let value = match cause.downcast_ref::<Fault>() {
                    Some(inner) => Value::Object(self.structured(language, inner, options)),
                    None => Value::from(cause.to_string()),
                };
                map.insert("cause".to_string(), value);
            }
        }

        if let Some(def) = def {
            map.insert("category".to_string(), Value::from(def.category()));
            map.insert("severity".to_string(), Value::from(def.severity().as_str()));
        }

        map
    }

    /// A fault created by bare key has no code of its own; borrow the
    /// resolved definition's.
    fn effective_code<'a>(fault: &'a Fault, def: Option<&'a crate::definition::Definition>) -> &'a str {
        if fault.code().is_empty() {
            def.map(|def| def.code()).unwrap_or_default()
        } else {
            fault.code()
        }
    }

    fn text(&self, language: &str, fault: &Fault, options: &FormatOptions) -> String {
        let def = self.localizer.resolve_definition(fault);
        let code = Self::effective_code(fault, def.as_deref());

        let mut lines = vec![self.localizer.localize_with_language(language, fault)];

        if !code.is_empty() {
            lines.push(format!("Code: {code}"));
        }

        if options.include_metadata && !fault.metadata().is_empty() {
            let meta: Map<String, Value> = fault
                .metadata()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let doc = serde_json::to_string(&Value::Object(meta))
                .expect("serializing an in-memory map is infallible");
            lines.push(format!("Metadata: {doc}"));
        }

        if options.include_cause {
            if let Some(cause) = fault.cause() {
                let rendered = match cause.downcast_ref::<Fault>() {
                    Some(inner) => self.text(language, inner, options),
                    None => cause.to_string(),
                };
                lines.push(format!("Cause: {rendered}"));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;
    use crate::definition::Definition;
    use crate::registry::Registry;

    fn formatter_with(defs: Vec<Definition>) -> Formatter {
        let registry = Arc::new(Registry::new());
        for def in defs {
            registry.register(def).unwrap();
        }
        Formatter::new(Localizer::new(registry))
    }

    fn not_found() -> Definition {
        Definition::new("NotFound", "E404")
            .with_category("http")
            .with_message("en", "Not Found")
            .with_message("cn", "未找到")
    }

    #[test]
    fn test_structured_field_order() {
        let formatter = formatter_with(vec![not_found()]);
        let rendered = formatter.format(&Context::new(), &Fault::new("NotFound"));

        let map = rendered.as_structured().unwrap();
        let fields: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(
            fields,
            ["key", "code", "message", "time", "category", "severity"]
        );
        assert_eq!(map["code"], "E404");
        assert_eq!(map["message"], "Not Found");
        assert_eq!(map["category"], "http");
        assert_eq!(map["severity"], "error");
    }

    #[test]
    fn test_structured_includes_metadata() {
        let formatter = formatter_with(vec![not_found()]);
        let fault = Fault::new("NotFound").with_meta("request_id", "r-17");
        let map = formatter
            .format(&Context::new(), &fault)
            .as_structured()
            .cloned()
            .unwrap();

        assert_eq!(map["metadata"]["request_id"], "r-17");
    }

    #[test]
    fn test_structured_nests_two_cause_levels() {
        let formatter = formatter_with(vec![]);
        let innermost = Fault::new("Innermost");
        let middle = Fault::wrap("Middle", innermost);
        let outer = Fault::wrap("Outer", middle);

        let map = formatter
            .format(&Context::new(), &outer)
            .as_structured()
            .cloned()
            .unwrap();

        assert_eq!(map["key"], "Outer");
        assert_eq!(map["cause"]["key"], "Middle");
        assert_eq!(map["cause"]["cause"]["key"], "Innermost");
    }

    #[test]
    fn test_structured_renders_foreign_cause_as_string() {
        let formatter = formatter_with(vec![]);
        let fault = Fault::wrap("Io", io::Error::other("disk offline"));
        let map = formatter
            .format(&Context::new(), &fault)
            .as_structured()
            .cloned()
            .unwrap();

        assert_eq!(map["cause"], "disk offline");
    }

    #[test]
    fn test_exclude_flags_suppress_blocks() {
        let formatter = formatter_with(vec![]);
        let fault = Fault::wrap("X", io::Error::other("boom")).with_meta("k", "v");
        let options = FormatOptions::new().with_metadata(false).with_cause(false);

        let map = formatter
            .format_with(&Context::new(), &fault, &options)
            .as_structured()
            .cloned()
            .unwrap();

        assert!(!map.contains_key("metadata"));
        assert!(!map.contains_key("cause"));
    }

    #[test]
    fn test_json_mode_matches_structured() {
        let formatter = formatter_with(vec![not_found()]);
        let fault = Fault::new("NotFound");

        let map = formatter
            .format(&Context::new(), &fault)
            .as_structured()
            .cloned()
            .unwrap();
        let options = FormatOptions::new().with_format(FormatMode::Json);
        let doc = formatter
            .format_with(&Context::new(), &fault, &options)
            .as_json()
            .unwrap()
            .to_string();

        let parsed: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed, Value::Object(map));
    }

    #[test]
    fn test_text_mode_lines() {
        let formatter = formatter_with(vec![not_found()]);
        let inner = Fault::new("Inner");
        let fault = Fault::new("NotFound")
            .caused_by(inner)
            .with_meta("request_id", "r-17");

        let options = FormatOptions::new().with_format(FormatMode::Text);
        let text = formatter
            .format_with(&Context::new(), &fault, &options)
            .as_text()
            .unwrap()
            .to_string();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Not Found");
        assert_eq!(lines[1], "Code: E404");
        assert!(lines.contains(&"Metadata: {\"request_id\":\"r-17\"}"));
        assert!(lines.contains(&"Cause: Inner"));
    }

    #[test]
    fn test_text_mode_omits_code_for_unregistered_fault() {
        let formatter = formatter_with(vec![]);
        let options = FormatOptions::new().with_format(FormatMode::Text);
        let text = formatter
            .format_with(&Context::new(), &Fault::new("Stray"), &options)
            .as_text()
            .unwrap()
            .to_string();

        assert!(!text.contains("Code:"));
    }

    #[test]
    fn test_text_mode_includes_code_for_definition_backed_fault() {
        let formatter = formatter_with(vec![]);
        let def = Arc::new(not_found());
        let fault = Fault::from_definition(def);

        let options = FormatOptions::new().with_format(FormatMode::Text);
        let text = formatter
            .format_with(&Context::new(), &fault, &options)
            .as_text()
            .unwrap()
            .to_string();

        assert_eq!(text, "Not Found\nCode: E404");
    }

    #[test]
    fn test_language_option_overrides_context() {
        let formatter = formatter_with(vec![not_found()]);
        let fault = Fault::new("NotFound");
        let cx = Context::new().with_language("en");

        let options = FormatOptions::new().with_language("cn");
        let map = formatter
            .format_with(&cx, &fault, &options)
            .as_structured()
            .cloned()
            .unwrap();

        assert_eq!(map["message"], "未找到");
    }

    #[test]
    fn test_format_mode_parse() {
        assert_eq!("JSON".parse::<FormatMode>().unwrap(), FormatMode::Json);
        assert_eq!("text".parse::<FormatMode>().unwrap(), FormatMode::Text);
        assert!("yaml".parse::<FormatMode>().is_err());
    }
}
