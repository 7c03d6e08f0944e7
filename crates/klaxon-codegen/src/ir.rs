//! Validation and lowering of catalog entries into a render-ready form.
//!
//! Lowering is where every default is applied and every generated name is
//! fixed, so the renderer can stay a dumb string emitter. Validation is
//! aggregating: a run reports all issues across all input files at once.

use std::collections::{BTreeMap, HashMap};
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use heck::{ToShoutySnakeCase, ToSnakeCase};
use klaxon::template;
use klaxon::Severity;

use crate::catalog::CatalogEntry;
use crate::error::{CatalogIssue, CodegenError, IssueCollector};

/// Fallback category for entries that do not declare one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A validated entry with all defaults applied and identifiers assigned.
#[derive(Debug, Clone)]
pub struct EntryIr {
    pub key: String,
    pub code: String,
    pub category: String,
    pub severity: Severity,
    pub description: String,
    pub messages: BTreeMap<String, String>,
    /// Constructor name, `snake_case` of the key.
    pub fn_ident: String,
    /// Name of the generated definition static.
    pub static_ident: String,
    /// Whether any message template carries a substitution directive.
    pub needs_args: bool,
}

/// All entries destined for one generated source file.
#[derive(Debug, Clone)]
pub struct ModuleUnit {
    /// File name without extension, derived from the input file.
    pub file_base: String,
    pub entries: Vec<EntryIr>,
}

/// Validates and lowers catalogs, one module unit per input file.
///
/// Duplicate keys and colliding identifiers are tracked across all inputs,
/// not per file. On any issue the whole run fails with the full list.
pub fn build_ir(sources: &[(PathBuf, Vec<CatalogEntry>)]) -> Result<Vec<ModuleUnit>, CodegenError> {
    let mut collector = IssueCollector::new();
    let mut seen_keys: HashMap<String, String> = HashMap::new();
    let mut seen_idents: HashMap<String, String> = HashMap::new();
    let mut seen_bases: HashMap<String, String> = HashMap::new();
    let mut units = Vec::with_capacity(sources.len());

    for (path, entries) in sources {
        let file = path.display().to_string();
        let file_base = sanitize_file_base(path);

        match seen_bases.entry(file_base.clone()) {
            Entry::Occupied(first) => collector.emit(CatalogIssue::DuplicateModule {
                file: file.clone(),
                other: first.get().clone(),
                base: file_base.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(file.clone());
            }
        }

        let mut lowered = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if let Some(ir) = lower_entry(
                &file,
                index,
                entry,
                &mut seen_keys,
                &mut seen_idents,
                &mut collector,
            ) {
                lowered.push(ir);
            }
        }

        units.push(ModuleUnit {
            file_base,
            entries: lowered,
        });
    }

    collector.finish()?;
    Ok(units)
}

fn lower_entry(
    file: &str,
    index: usize,
    entry: &CatalogEntry,
    seen_keys: &mut HashMap<String, String>,
    seen_idents: &mut HashMap<String, String>,
    collector: &mut IssueCollector,
) -> Option<EntryIr> {
    if entry.key.is_empty() {
        collector.emit(CatalogIssue::EmptyKey {
            file: file.to_string(),
            index: index + 1,
        });
        return None;
    }

    let mut ok = true;

    if entry.code.is_empty() {
        collector.emit(CatalogIssue::EmptyCode {
            file: file.to_string(),
            key: entry.key.clone(),
        });
        ok = false;
    }

    if !entry.key.starts_with(|c: char| c.is_ascii_alphabetic()) {
        collector.emit(CatalogIssue::InvalidKey {
            file: file.to_string(),
            key: entry.key.clone(),
        });
        ok = false;
    }

    let severity = match entry.severity.as_deref() {
        None => Severity::default(),
        Some(token) => match Severity::from_str(token) {
            Ok(severity) => severity,
            Err(_) => {
                collector.emit(CatalogIssue::UnknownSeverity {
                    file: file.to_string(),
                    key: entry.key.clone(),
                    severity: token.to_string(),
                });
                ok = false;
                Severity::default()
            }
        },
    };

    let messages: BTreeMap<String, String> = entry
        .message
        .iter()
        .map(|(tag, template)| (tag.to_lowercase(), template.clone()))
        .collect();

    if messages.is_empty() {
        collector.emit(CatalogIssue::NoMessages {
            file: file.to_string(),
            key: entry.key.clone(),
        });
        ok = false;
    }

    match seen_keys.entry(entry.key.clone()) {
        Entry::Occupied(first) => {
            collector.emit(CatalogIssue::DuplicateKey {
                file: file.to_string(),
                key: entry.key.clone(),
                first_file: first.get().clone(),
            });
            ok = false;
        }
        Entry::Vacant(slot) => {
            slot.insert(file.to_string());
        }
    }

    let fn_ident = fn_identifier(&entry.key);
    match seen_idents.entry(fn_ident.clone()) {
        Entry::Occupied(holder) => {
            // A repeated key was already reported; only distinct keys that
            // lower to the same name are a collision.
            if holder.get() != &entry.key {
                collector.emit(CatalogIssue::IdentifierCollision {
                    file: file.to_string(),
                    key: entry.key.clone(),
                    other: holder.get().clone(),
                });
                ok = false;
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(entry.key.clone());
        }
    }

    if !ok {
        return None;
    }

    let needs_args = messages
        .values()
        .any(|template| template::requires_arguments(template));

    Some(EntryIr {
        key: entry.key.clone(),
        code: entry.code.clone(),
        category: entry
            .category
            .clone()
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        severity,
        description: entry
            .description
            .clone()
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| humanize(&entry.key)),
        messages,
        static_ident: static_identifier(&entry.key),
        fn_ident,
        needs_args,
    })
}

/// Rust keywords, including reserved ones, that a lowered key must not
/// shadow.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

fn fn_identifier(key: &str) -> String {
    let mut ident = key.to_snake_case();
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

fn static_identifier(key: &str) -> String {
    format!("{}_DEF", key.to_shouty_snake_case())
}

/// Turns `MissingParameter` into `Missing parameter` for default
/// descriptions.
fn humanize(key: &str) -> String {
    let spaced = key.to_snake_case().replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Derives a module file name from an input path: lowercased stem with
/// anything outside `[a-z0-9]` replaced by `_`, prefixed when it would
/// start with a digit.
fn sanitize_file_base(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("catalog");

    let mut base: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if base.is_empty() {
        base.push_str("catalog");
    }
    if base.starts_with(|c: char| c.is_ascii_digit()) {
        base.insert(0, '_');
    }
    base
}
