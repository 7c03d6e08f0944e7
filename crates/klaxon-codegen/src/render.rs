//! Emission of validated entries as Rust source text.
//!
//! The renderer is a single pass over the lowered IR: every name, default,
//! and escape decision was already made, so all that happens here is string
//! assembly. A generated module contains one definition static and a family
//! of constructor functions per entry, plus a `register_all` routine that
//! loads the whole file into a [`klaxon::Registry`].

use std::fmt::Write;

use klaxon::Severity;

use crate::error::CodegenError;
use crate::ir::{EntryIr, ModuleUnit};

const HEADER: &str = "// @generated by klaxon-codegen. DO NOT EDIT.";

/// Renders one module file from the entries of a single catalog.
pub(crate) fn render_module(entries: &[EntryIr]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");

    if entries.is_empty() {
        out.push_str("use klaxon::Registry;\n\n");
        out.push_str("/// Registers every definition in this module.\n");
        out.push_str("pub fn register_all(_registry: &Registry) {}\n");
        return out;
    }

    out.push_str("use std::sync::{Arc, LazyLock};\n\n");
    out.push_str("use klaxon::{Definition, Fault, Registry, Severity, Value};\n\n");

    for entry in entries {
        render_static(&mut out, entry);
        out.push('\n');
        render_constructors(&mut out, entry);
    }

    render_register_all(&mut out, entries);
    out
}

/// Renders the aggregating `mod.rs` for a multi-catalog run.
///
/// Declares and re-exports each per-catalog module, then defines its own
/// `register_all` covering all of them. The explicit function shadows the
/// glob re-exports, so `module::register_all` always means "everything".
pub(crate) fn render_mod_rs(units: &[ModuleUnit]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str("\n\n");

    for unit in units {
        let _ = writeln!(out, "pub mod {};", unit.file_base);
    }
    out.push('\n');
    for unit in units {
        let _ = writeln!(out, "pub use {}::*;", unit.file_base);
    }
    out.push('\n');
    out.push_str("use klaxon::Registry;\n\n");
    out.push_str("/// Registers every definition from every catalog module.\n");
    out.push_str("///\n");
    out.push_str("/// # Panics\n");
    out.push_str("///\n");
    out.push_str("/// Panics when any registration is rejected, which means the generated\n");
    out.push_str("/// modules and the catalogs they came from have drifted.\n");
    out.push_str("pub fn register_all(registry: &Registry) {\n");
    for unit in units {
        let _ = writeln!(out, "    {}::register_all(registry);", unit.file_base);
    }
    out.push_str("}\n");
    out
}

fn render_static(out: &mut String, entry: &EntryIr) {
    let _ = writeln!(
        out,
        "static {}: LazyLock<Arc<Definition>> = LazyLock::new(|| {{",
        entry.static_ident
    );
    out.push_str("    Arc::new(\n");
    let _ = writeln!(
        out,
        "        Definition::new(\"{}\", \"{}\")",
        escape(&entry.key),
        escape(&entry.code)
    );
    let _ = writeln!(
        out,
        "            .with_category(\"{}\")",
        escape(&entry.category)
    );
    let _ = writeln!(
        out,
        "            .with_severity({})",
        severity_variant(entry.severity)
    );
    let _ = writeln!(
        out,
        "            .with_description(\"{}\")",
        escape(&entry.description)
    );
    for (tag, template) in &entry.messages {
        let _ = writeln!(
            out,
            "            .with_message(\"{}\", \"{}\")",
            escape(tag),
            escape(template)
        );
    }
    // Move the builder-chain terminator onto the last call.
    if out.ends_with(")\n") {
        out.truncate(out.len() - 1);
        out.push_str(",\n");
    }
    out.push_str("    )\n");
    out.push_str("});\n");
}

fn render_constructors(out: &mut String, entry: &EntryIr) {
    let doc = doc_line(&entry.description);

    let _ = writeln!(out, "/// {doc}");
    let _ = writeln!(out, "pub fn {}() -> Fault {{", entry.fn_ident);
    let _ = writeln!(
        out,
        "    Fault::from_definition(Arc::clone(&{}))",
        entry.static_ident
    );
    out.push_str("}\n\n");

    if entry.needs_args {
        let _ = writeln!(out, "/// {doc}, with positional message arguments bound.");
        let _ = writeln!(out, "pub fn {}_with_args<I, S>(args: I) -> Fault", entry.fn_ident);
        out.push_str("where\n");
        out.push_str("    I: IntoIterator<Item = S>,\n");
        out.push_str("    S: Into<String>,\n");
        out.push_str("{\n");
        let _ = writeln!(out, "    {}().args(args)", entry.fn_ident);
        out.push_str("}\n\n");
    }

    let _ = writeln!(out, "/// {doc}, with one metadata entry attached.");
    let _ = writeln!(
        out,
        "pub fn {}_with_meta(key: impl Into<String>, value: impl Into<Value>) -> Fault {{",
        entry.fn_ident
    );
    let _ = writeln!(out, "    {}().with_meta(key, value)", entry.fn_ident);
    out.push_str("}\n\n");
}

fn render_register_all(out: &mut String, entries: &[EntryIr]) {
    out.push_str("/// Registers every definition in this module.\n");
    out.push_str("///\n");
    out.push_str("/// # Panics\n");
    out.push_str("///\n");
    out.push_str("/// Panics when a registration is rejected, which means this generated\n");
    out.push_str("/// module and the catalog it came from have drifted.\n");
    out.push_str("pub fn register_all(registry: &Registry) {\n");
    for entry in entries {
        out.push_str("    registry\n");
        let _ = writeln!(out, "        .register(Definition::clone(&{}))", entry.static_ident);
        let _ = writeln!(
            out,
            "        .expect(\"generated definition `{}` failed to register\");",
            escape(&entry.key)
        );
    }
    out.push_str("}\n");
}

fn severity_variant(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "Severity::Warning",
        Severity::Error => "Severity::Error",
        Severity::Critical => "Severity::Critical",
    }
}

/// Escapes a string for embedding inside a double-quoted Rust literal.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Collapses a description onto one line for use in a doc comment.
fn doc_line(description: &str) -> String {
    description.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Verifies that rendered source has balanced delimiters outside string
/// literals and line comments.
///
/// This is a tripwire for emitter defects, not a parser: a failure here is a
/// bug in the renderer itself and aborts the run before anything is written.
pub(crate) fn self_check(name: &str, source: &str) -> Result<(), CodegenError> {
    let mut depth: i64 = 0;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '"' => {
                let mut escaped = false;
                for next in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if next == '\\' {
                        escaped = true;
                    } else if next == '"' {
                        break;
                    }
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return Err(CodegenError::Generation(format!(
                        "`{name}` has an unmatched `{c}`"
                    )));
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(CodegenError::Generation(format!(
            "`{name}` has {depth} unclosed delimiter(s)"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::catalog::CatalogEntry;
    use crate::ir::build_ir;

    use super::*;

    fn lowered(key: &str, messages: &[(&str, &str)]) -> EntryIr {
        let entry = CatalogEntry {
            key: key.to_string(),
            code: key.to_string(),
            message: messages
                .iter()
                .map(|(tag, template)| (tag.to_string(), template.to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..CatalogEntry::default()
        };
        let units = build_ir(&[(PathBuf::from("errors.yaml"), vec![entry])]).unwrap();
        units[0].entries[0].clone()
    }

    #[test]
    fn test_module_emits_static_and_constructors() {
        let entry = lowered("MissingParameter", &[("en", "Missing Parameter: %s")]);
        let source = render_module(&[entry]);

        assert!(source.starts_with("// @generated"));
        assert!(source.contains(
            "static MISSING_PARAMETER_DEF: LazyLock<Arc<Definition>> = LazyLock::new(|| {"
        ));
        assert!(source.contains("Definition::new(\"MissingParameter\", \"MissingParameter\")"));
        assert!(source.contains(".with_message(\"en\", \"Missing Parameter: %s\")"));
        assert!(source.contains("pub fn missing_parameter() -> Fault {"));
        assert!(source.contains("pub fn missing_parameter_with_args<I, S>(args: I) -> Fault"));
        assert!(source.contains("pub fn missing_parameter_with_meta("));
        assert!(source.contains(".register(Definition::clone(&MISSING_PARAMETER_DEF))"));
        assert!(
            source.contains("\"generated definition `MissingParameter` failed to register\"")
        );
    }

    #[test]
    fn test_literal_entry_skips_args_constructor() {
        let entry = lowered("Done", &[("en", "100%% done")]);
        let source = render_module(&[entry]);

        assert!(source.contains("pub fn done() -> Fault {"));
        assert!(!source.contains("done_with_args"));
        assert!(source.contains("pub fn done_with_meta("));
    }

    #[test]
    fn test_messages_and_quotes_are_escaped() {
        let entry = lowered("Odd", &[("en", "line\none \"two\" back\\slash")]);
        let source = render_module(&[entry]);

        assert!(source.contains(r#".with_message("en", "line\none \"two\" back\\slash")"#));
        self_check("odd.rs", &source).unwrap();
    }

    #[test]
    fn test_empty_module_still_registers() {
        let source = render_module(&[]);
        assert!(source.contains("pub fn register_all(_registry: &Registry) {}"));
        self_check("mod.rs", &source).unwrap();
    }

    #[test]
    fn test_mod_rs_declares_and_aggregates() {
        let units = vec![
            ModuleUnit {
                file_base: "auth".to_string(),
                entries: Vec::new(),
            },
            ModuleUnit {
                file_base: "http".to_string(),
                entries: Vec::new(),
            },
        ];
        let source = render_mod_rs(&units);

        assert!(source.contains("pub mod auth;"));
        assert!(source.contains("pub mod http;"));
        assert!(source.contains("pub use auth::*;"));
        assert!(source.contains("auth::register_all(registry);"));
        assert!(source.contains("http::register_all(registry);"));
        self_check("mod.rs", &source).unwrap();
    }

    #[test]
    fn test_rendered_module_passes_self_check() {
        let entry = lowered("MissingParameter", &[("en", "Missing Parameter: %s")]);
        let source = render_module(&[entry]);
        self_check("mod.rs", &source).unwrap();
    }

    #[test]
    fn test_self_check_rejects_imbalance() {
        assert!(self_check("bad.rs", "fn broken( {").is_err());
        assert!(self_check("bad.rs", "fn broken() }").is_err());
        // Delimiters inside strings and comments do not count.
        self_check("ok.rs", "// unmatched ( here\nlet s = \"also ( here\";").unwrap();
    }

    #[test]
    fn test_escape_rules() {
        assert_eq!(escape(r#"a "b" c"#), r#"a \"b\" c"#);
        assert_eq!(escape("tab\there"), "tab\\there");
        assert_eq!(escape("back\\slash"), "back\\\\slash");
    }
}
