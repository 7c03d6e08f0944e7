//! The processing pipeline: middleware around handler dispatch.

use std::sync::Arc;

use log::debug;

use crate::context::Context;
use crate::fault::Fault;
use crate::format::{Formatter, Rendered};
use crate::localize::Localizer;
use crate::registry::Registry;

/// Renders the faults it recognizes.
///
/// Handlers are consulted in registration order; the first one whose
/// [`can_handle`](Handler::can_handle) returns `true` wins.
pub trait Handler: Send + Sync {
    /// Whether this handler wants the fault.
    fn can_handle(&self, fault: &Fault) -> bool;

    /// Renders the fault.
    fn handle(&self, cx: &Context, fault: &Fault) -> Rendered;
}

/// Continuation passed to middleware; invokes the rest of the pipeline.
pub type Next<'a> = &'a dyn Fn(&Context, &Fault) -> Rendered;

/// Wraps the pipeline. A middleware may inspect or replace the fault and
/// context before calling `next`, rework the result afterwards, or skip
/// `next` entirely and answer on its own.
pub trait Middleware: Send + Sync {
    fn handle(&self, cx: &Context, fault: &Fault, next: Next<'_>) -> Rendered;
}

impl<F> Middleware for F
where
    F: Fn(&Context, &Fault, Next<'_>) -> Rendered + Send + Sync,
{
    fn handle(&self, cx: &Context, fault: &Fault, next: Next<'_>) -> Rendered {
        self(cx, fault, next)
    }
}

/// The front door for turning faults into output.
///
/// Middleware runs in registration order on the way in and reverse order on
/// the way out. Inside the onion, the first matching [`Handler`] renders the
/// fault; when none matches, the engine's [`Formatter`] does.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use klaxon::{Context, Definition, Fault, ProcessorEngine, Registry};
///
/// let registry = Arc::new(Registry::new());
/// registry
///     .register(Definition::new("NotFound", "E404").with_message("en", "Not Found"))
///     .unwrap();
///
/// let engine = ProcessorEngine::new(registry);
/// let rendered = engine.process(&Context::new(), &Fault::new("NotFound"));
/// assert_eq!(rendered.as_structured().unwrap()["message"], "Not Found");
/// ```
pub struct ProcessorEngine {
    localizer: Localizer,
    formatter: Formatter,
    handlers: Vec<Box<dyn Handler>>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl std::fmt::Debug for ProcessorEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorEngine")
            .field("handlers", &self.handlers.len())
            .field("middleware", &self.middleware.len())
            .finish()
    }
}

impl ProcessorEngine {
    /// Creates an engine over the given registry with a default formatter
    /// and no handlers or middleware.
    pub fn new(registry: Arc<Registry>) -> Self {
        let localizer = Localizer::new(registry);
        let formatter = Formatter::new(localizer.clone());
        Self {
            localizer,
            formatter,
            handlers: Vec::new(),
            middleware: Vec::new(),
        }
    }

    /// Replaces the engine's localizer.
    #[must_use]
    pub fn with_localizer(mut self, localizer: Localizer) -> Self {
        self.localizer = localizer;
        self
    }

    /// Replaces the fallback formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Appends a handler. Order matters: earlier handlers win ties.
    #[must_use]
    pub fn add_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Appends a middleware layer around everything registered so far.
    #[must_use]
    pub fn add_middleware(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// The engine's localizer.
    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// The engine's fallback formatter.
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Runs the fault through the full pipeline.
    pub fn process(&self, cx: &Context, fault: &Fault) -> Rendered {
        self.run(0, cx, fault)
    }

    fn run(&self, index: usize, cx: &Context, fault: &Fault) -> Rendered {
        match self.middleware.get(index) {
            Some(stage) => {
                let next = |cx: &Context, fault: &Fault| self.run(index + 1, cx, fault);
                stage.handle(cx, fault, &next)
            }
            None => self.dispatch(cx, fault),
        }
    }

    fn dispatch(&self, cx: &Context, fault: &Fault) -> Rendered {
        for handler in &self.handlers {
            if handler.can_handle(fault) {
                return handler.handle(cx, fault);
            }
        }
        debug!(key = fault.key(); "No handler claimed fault, formatting directly");
        self.formatter.format(cx, fault)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::definition::Definition;
    use crate::format::{FormatMode, FormatOptions};

    fn engine_with(defs: Vec<Definition>) -> ProcessorEngine {
        let registry = Arc::new(Registry::new());
        for def in defs {
            registry.register(def).unwrap();
        }
        ProcessorEngine::new(registry)
    }

    struct KeyHandler {
        key: &'static str,
        label: &'static str,
    }

    impl Handler for KeyHandler {
        fn can_handle(&self, fault: &Fault) -> bool {
            fault.key() == self.key
        }

        fn handle(&self, _cx: &Context, _fault: &Fault) -> Rendered {
            Rendered::Text(self.label.to_string())
        }
    }

    #[test]
    fn test_default_pipeline_formats() {
        let engine = engine_with(vec![
            Definition::new("NotFound", "E404").with_message("en", "Not Found"),
        ]);

        let rendered = engine.process(&Context::new(), &Fault::new("NotFound"));
        let map = rendered.as_structured().unwrap();
        assert_eq!(map["message"], "Not Found");
        assert_eq!(map["code"], "E404");
    }

    #[test]
    fn test_first_matching_handler_wins() {
        let engine = engine_with(vec![])
            .add_handler(KeyHandler { key: "A", label: "first" })
            .add_handler(KeyHandler { key: "A", label: "second" })
            .add_handler(KeyHandler { key: "B", label: "other" });

        let a = engine.process(&Context::new(), &Fault::new("A"));
        assert_eq!(a.as_text(), Some("first"));

        let b = engine.process(&Context::new(), &Fault::new("B"));
        assert_eq!(b.as_text(), Some("other"));
    }

    #[test]
    fn test_unclaimed_fault_falls_back_to_formatter() {
        let engine = engine_with(vec![]).add_handler(KeyHandler { key: "A", label: "a" });

        let rendered = engine.process(&Context::new(), &Fault::new("Unclaimed"));
        assert!(rendered.as_structured().is_some());
    }

    #[test]
    fn test_middleware_runs_as_an_onion() {
        let trace = Arc::new(Mutex::new(Vec::new()));

        let note = |trace: &Arc<Mutex<Vec<&'static str>>>, label: &'static str| {
            trace.lock().unwrap().push(label);
        };

        let outer_trace = Arc::clone(&trace);
        let inner_trace = Arc::clone(&trace);
        let engine = engine_with(vec![])
            .add_middleware(move |cx: &Context, fault: &Fault, next: Next<'_>| {
                note(&outer_trace, "outer-enter");
                let rendered = next(cx, fault);
                note(&outer_trace, "outer-exit");
                rendered
            })
            .add_middleware(move |cx: &Context, fault: &Fault, next: Next<'_>| {
                note(&inner_trace, "inner-enter");
                let rendered = next(cx, fault);
                note(&inner_trace, "inner-exit");
                rendered
            });

        engine.process(&Context::new(), &Fault::new("X"));

        let order = trace.lock().unwrap().clone();
        assert_eq!(
            order,
            ["outer-enter", "inner-enter", "inner-exit", "outer-exit"]
        );
    }

    #[test]
    fn test_middleware_can_short_circuit() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let outer_trace = Arc::clone(&trace);
        let inner_trace = Arc::clone(&trace);

        let engine = engine_with(vec![])
            .add_middleware(move |_cx: &Context, _fault: &Fault, _next: Next<'_>| {
                outer_trace.lock().unwrap().push("outer");
                Rendered::Text("intercepted".to_string())
            })
            .add_middleware(move |cx: &Context, fault: &Fault, next: Next<'_>| {
                inner_trace.lock().unwrap().push("inner");
                next(cx, fault)
            })
            .add_handler(KeyHandler { key: "X", label: "handled" });

        let rendered = engine.process(&Context::new(), &Fault::new("X"));

        assert_eq!(rendered.as_text(), Some("intercepted"));
        assert_eq!(*trace.lock().unwrap(), ["outer"]);
    }

    #[test]
    fn test_middleware_can_rewrite_the_fault() {
        let engine = engine_with(vec![]).add_middleware(
            |cx: &Context, fault: &Fault, next: Next<'_>| {
                let enriched = fault.with_meta("stage", "ingress");
                next(cx, &enriched)
            },
        );

        let map = engine
            .process(&Context::new(), &Fault::new("X"))
            .as_structured()
            .cloned()
            .unwrap();
        assert_eq!(map["metadata"]["stage"], "ingress");
    }

    #[test]
    fn test_custom_formatter_options_apply() {
        let registry = Arc::new(Registry::new());
        let localizer = Localizer::new(Arc::clone(&registry));
        let formatter = Formatter::new(localizer)
            .with_options(FormatOptions::new().with_format(FormatMode::Text));

        let engine = ProcessorEngine::new(registry).with_formatter(formatter);
        let rendered = engine.process(&Context::new(), &Fault::new("X"));
        assert!(rendered.as_text().is_some());
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessorEngine>();
    }
}
