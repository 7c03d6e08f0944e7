//! Catalog compilation for the `klaxon` runtime.
//!
//! This crate turns declarative YAML error catalogs into Rust modules that
//! populate a [`klaxon::Registry`] at startup. A run is batch and
//! all-or-nothing: every input catalog is loaded, every entry is validated
//! (with all issues reported together), the whole output is rendered and
//! self-checked in memory, and only then is anything written to disk.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use klaxon_codegen::Generator;
//!
//! let generator = Generator::new("errors", "src/errors");
//! let report = generator.run(&[PathBuf::from("errors.yaml")])?;
//! println!("{} entries across {} files", report.entries, report.files.len());
//! # Ok::<(), klaxon_codegen::CodegenError>(())
//! ```

mod catalog;
mod error;
mod ir;
mod render;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

pub use catalog::{CatalogEntry, CatalogFile, load_catalog};
pub use error::{CatalogIssue, CodegenError, ValidationError};
pub use ir::{DEFAULT_CATEGORY, EntryIr, ModuleUnit, build_ir};

/// What a successful generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Total catalog entries across all inputs.
    pub entries: usize,

    /// Paths of the files written, in write order.
    pub files: Vec<PathBuf>,
}

/// Compiles catalog files into one generated Rust module directory.
#[derive(Debug, Clone)]
pub struct Generator {
    module: String,
    out_dir: PathBuf,
}

impl Generator {
    /// Creates a generator targeting `module`, written under `out_dir`.
    pub fn new(module: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            out_dir: out_dir.into(),
        }
    }

    /// The target module name.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Runs the full pipeline over `inputs`.
    ///
    /// A single input catalog renders directly into `mod.rs`; multiple
    /// catalogs each get their own file plus an aggregating `mod.rs`. On any
    /// load, validation, or rendering failure nothing is written.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<GenerateReport, CodegenError> {
        info!(
            module = self.module,
            out_dir = self.out_dir.display().to_string(),
            inputs = inputs.len();
            "Generating error modules"
        );

        let mut sources = Vec::with_capacity(inputs.len());
        for path in inputs {
            let entries = catalog::load_catalog(path)?;
            sources.push((path.clone(), entries));
        }

        let units = ir::build_ir(&sources)?;
        let entries = units.iter().map(|unit| unit.entries.len()).sum();

        let mut rendered: Vec<(PathBuf, String)> = Vec::new();
        if let [unit] = units.as_slice() {
            rendered.push((self.out_dir.join("mod.rs"), render::render_module(&unit.entries)));
        } else {
            rendered.push((self.out_dir.join("mod.rs"), render::render_mod_rs(&units)));
            for unit in &units {
                rendered.push((
                    self.out_dir.join(format!("{}.rs", unit.file_base)),
                    render::render_module(&unit.entries),
                ));
            }
        }

        for (path, source) in &rendered {
            render::self_check(&path.display().to_string(), source)?;
        }

        fs::create_dir_all(&self.out_dir).map_err(|source| CodegenError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut files = Vec::with_capacity(rendered.len());
        for (path, source) in rendered {
            fs::write(&path, source).map_err(|source| CodegenError::Io {
                path: path.clone(),
                source,
            })?;
            debug!(path = path.display().to_string(); "Wrote generated module");
            files.push(path);
        }

        info!(entries = entries, files = files.len(); "Generation complete");
        Ok(GenerateReport { entries, files })
    }
}
