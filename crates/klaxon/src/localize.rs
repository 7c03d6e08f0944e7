//! Language resolution for faults.

use std::sync::Arc;

use log::debug;

use crate::context::Context;
use crate::definition::Definition;
use crate::fault::Fault;
use crate::registry::Registry;
use crate::template;

/// Resolves a [`Fault`] to a language-specific message string.
///
/// Resolution is total. The requested language falls back to `"en"`, then
/// to the first message the definition carries (in tag order, so the choice
/// is deterministic), then to the fault's own string rendering. A fault
/// without an attached definition is looked up in the registry by key.
#[derive(Debug, Clone)]
pub struct Localizer {
    registry: Arc<Registry>,
}

impl Localizer {
    /// Creates a localizer over `registry`.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// The registry this localizer consults.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Localizes using the context's language hint.
    pub fn localize(&self, cx: &Context, fault: &Fault) -> String {
        self.localize_with_language(cx.language(), fault)
    }

    /// Localizes into `lang`, with the documented fallback chain.
    ///
    /// Bound arguments are substituted positionally into the resolved
    /// template. Never returns an empty string for a definition that
    /// carries at least one message.
    pub fn localize_with_language(&self, lang: &str, fault: &Fault) -> String {
        let Some(def) = self.resolve_definition(fault) else {
            return fault.to_string();
        };

        let template = def
            .message(lang)
            .or_else(|| def.message(Context::DEFAULT_LANGUAGE))
            .or_else(|| def.messages().values().next().map(String::as_str));
        let Some(template) = template else {
            debug!(key = fault.key(), lang = lang; "Definition carries no messages");
            return fault.to_string();
        };

        if fault.arguments().is_empty() {
            template.to_string()
        } else {
            template::render(template, fault.arguments())
        }
    }

    /// Sorted union of language tags across every registered definition.
    pub fn supported_languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self
            .registry
            .list()
            .iter()
            .flat_map(|def| def.messages().keys().cloned())
            .collect();
        langs.sort();
        langs.dedup();
        langs
    }

    /// The fault's own definition when attached, else a registry lookup.
    pub(crate) fn resolve_definition(&self, fault: &Fault) -> Option<Arc<Definition>> {
        fault
            .definition()
            .cloned()
            .or_else(|| self.registry.get(fault.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localizer_with(defs: Vec<Definition>) -> Localizer {
        let registry = Arc::new(Registry::new());
        for def in defs {
            registry.register(def).unwrap();
        }
        Localizer::new(registry)
    }

    #[test]
    fn test_exact_language_match() {
        let localizer = localizer_with(vec![
            Definition::new("X", "X")
                .with_message("en", "hello")
                .with_message("cn", "你好"),
        ]);
        let fault = Fault::new("X");

        assert_eq!(localizer.localize_with_language("cn", &fault), "你好");
    }

    #[test]
    fn test_missing_language_falls_back_to_english() {
        let localizer = localizer_with(vec![
            Definition::new("X", "X")
                .with_message("en", "hello")
                .with_message("cn", "你好"),
        ]);
        let fault = Fault::new("X");

        assert_eq!(localizer.localize_with_language("fr", &fault), "hello");
    }

    #[test]
    fn test_missing_english_falls_back_deterministically() {
        let localizer = localizer_with(vec![
            Definition::new("X", "X")
                .with_message("cn", "你好")
                .with_message("de", "hallo"),
        ]);
        let fault = Fault::new("X");

        // First message in tag order; never empty.
        assert_eq!(localizer.localize_with_language("fr", &fault), "你好");
    }

    #[test]
    fn test_language_lookup_ignores_case() {
        let localizer =
            localizer_with(vec![Definition::new("X", "X").with_message("cn", "你好")]);
        let fault = Fault::new("X");

        assert_eq!(localizer.localize_with_language("CN", &fault), "你好");
    }

    #[test]
    fn test_arguments_are_substituted() {
        let localizer = localizer_with(vec![
            Definition::new("MissingParameter", "MissingParameter")
                .with_message("en", "Missing Parameter: %s"),
        ]);
        let fault = Fault::new("MissingParameter").args(["UserId"]);

        assert_eq!(
            localizer.localize_with_language("en", &fault),
            "Missing Parameter: UserId"
        );
    }

    #[test]
    fn test_unregistered_fault_uses_own_rendering() {
        let localizer = localizer_with(vec![]);
        let fault = Fault::new("Unknown");

        assert_eq!(localizer.localize_with_language("en", &fault), "Unknown");
    }

    #[test]
    fn test_attached_definition_wins_over_registry() {
        let localizer =
            localizer_with(vec![Definition::new("X", "X").with_message("en", "registry")]);
        let attached = Arc::new(Definition::new("X", "X").with_message("en", "attached"));
        let fault = Fault::from_definition(attached);

        assert_eq!(localizer.localize_with_language("en", &fault), "attached");
    }

    #[test]
    fn test_localize_reads_context_hint() {
        let localizer = localizer_with(vec![
            Definition::new("X", "X")
                .with_message("en", "hello")
                .with_message("cn", "你好"),
        ]);
        let fault = Fault::new("X");

        assert_eq!(localizer.localize(&Context::new(), &fault), "hello");
        assert_eq!(
            localizer.localize(&Context::new().with_language("cn"), &fault),
            "你好"
        );
    }

    #[test]
    fn test_supported_languages_union() {
        let localizer = localizer_with(vec![
            Definition::new("A", "A")
                .with_message("en", "a")
                .with_message("cn", "a"),
            Definition::new("B", "B")
                .with_message("en", "b")
                .with_message("de", "b"),
        ]);

        assert_eq!(localizer.supported_languages(), ["cn", "de", "en"]);
    }
}
