// @generated by klaxon-codegen. DO NOT EDIT.

use std::sync::{Arc, LazyLock};

use klaxon::{Definition, Fault, Registry, Severity, Value};

static MISSING_PARAMETER_DEF: LazyLock<Arc<Definition>> = LazyLock::new(|| {
    Arc::new(
        Definition::new("MissingParameter", "MissingParameter")
            .with_category("validation")
            .with_severity(Severity::Warning)
            .with_description("Missing parameter")
            .with_message("cn", "缺少参数: %s")
            .with_message("en", "Missing Parameter: %s"),
    )
});

/// Missing parameter
pub fn missing_parameter() -> Fault {
    Fault::from_definition(Arc::clone(&MISSING_PARAMETER_DEF))
}

/// Missing parameter, with positional message arguments bound.
pub fn missing_parameter_with_args<I, S>(args: I) -> Fault
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    missing_parameter().args(args)
}

/// Missing parameter, with one metadata entry attached.
pub fn missing_parameter_with_meta(key: impl Into<String>, value: impl Into<Value>) -> Fault {
    missing_parameter().with_meta(key, value)
}

static NOT_FOUND_DEF: LazyLock<Arc<Definition>> = LazyLock::new(|| {
    Arc::new(
        Definition::new("NotFound", "E404")
            .with_category("general")
            .with_severity(Severity::Error)
            .with_description("Not found")
            .with_message("en", "Not Found"),
    )
});

/// Not found
pub fn not_found() -> Fault {
    Fault::from_definition(Arc::clone(&NOT_FOUND_DEF))
}

/// Not found, with one metadata entry attached.
pub fn not_found_with_meta(key: impl Into<String>, value: impl Into<Value>) -> Fault {
    not_found().with_meta(key, value)
}

/// Registers every definition in this module.
///
/// # Panics
///
/// Panics when a registration is rejected, which means this generated
/// module and the catalog it came from have drifted.
pub fn register_all(registry: &Registry) {
    registry
        .register(Definition::clone(&MISSING_PARAMETER_DEF))
        .expect("generated definition `MissingParameter` failed to register");
    registry
        .register(Definition::clone(&NOT_FOUND_DEF))
        .expect("generated definition `NotFound` failed to register");
}
