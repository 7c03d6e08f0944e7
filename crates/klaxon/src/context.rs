//! Request-scoped rendering hints.

/// Per-request hints threaded through localization and processing.
///
/// The host builds one `Context` per request (or render site) and passes it
/// down the pipeline; an absent language hint falls back to
/// [`Context::DEFAULT_LANGUAGE`].
///
/// # Example
///
/// ```
/// use klaxon::Context;
///
/// assert_eq!(Context::new().language(), "en");
/// assert_eq!(Context::new().with_language("CN").language(), "CN");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    language: Option<String>,
}

impl Context {
    /// Language used when no hint is present.
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language hint.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// The language hint, defaulting to `"en"`.
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(Self::DEFAULT_LANGUAGE)
    }
}
