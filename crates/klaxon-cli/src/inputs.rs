//! Expansion of input arguments into concrete catalog files.
//!
//! `gen` accepts plain files, directories (scanned non-recursively for
//! `.yaml`/`.yml`), and glob patterns. Every branch that yields nothing is a
//! distinct error so the operator can tell a typo'd path from an empty
//! directory from an over-tight pattern.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// A problem collecting catalog files from the command line.
#[derive(Debug, Error)]
pub enum InputError {
    /// A named path does not exist.
    #[error("input path `{}` does not exist", .0.display())]
    Missing(PathBuf),

    /// A glob pattern could not be compiled.
    #[error("invalid glob pattern `{pattern}`")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A glob pattern matched nothing.
    #[error("glob pattern `{0}` matched no files")]
    EmptyGlob(String),

    /// A directory holds no catalog files.
    #[error("directory `{}` contains no catalog files", .0.display())]
    EmptyDirectory(PathBuf),

    /// A named file is not a catalog.
    #[error("`{}` is not a catalog file (expected .yaml or .yml)", .0.display())]
    NotCatalog(PathBuf),

    /// The inputs expanded to nothing at all.
    #[error("no catalog files to generate from")]
    NoInputs,

    /// Reading a directory failed.
    #[error("failed to read directory `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Expands `inputs` into a sorted, deduplicated list of catalog files.
pub fn collect_inputs(inputs: &[String]) -> Result<Vec<PathBuf>, InputError> {
    let mut files = BTreeSet::new();

    for input in inputs {
        if input.is_empty() {
            continue;
        }
        if is_glob(input) {
            expand_glob(input, &mut files)?;
            continue;
        }

        let path = Path::new(input);
        if !path.exists() {
            return Err(InputError::Missing(path.to_path_buf()));
        }
        if path.is_dir() {
            expand_directory(path, &mut files)?;
        } else if is_catalog_file(path) {
            files.insert(path.to_path_buf());
        } else {
            return Err(InputError::NotCatalog(path.to_path_buf()));
        }
    }

    if files.is_empty() {
        return Err(InputError::NoInputs);
    }

    let files: Vec<PathBuf> = files.into_iter().collect();
    debug!(count = files.len(); "Collected catalog files");
    Ok(files)
}

fn expand_glob(pattern: &str, files: &mut BTreeSet<PathBuf>) -> Result<(), InputError> {
    let matches = glob::glob(pattern).map_err(|source| InputError::BadPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matched = false;
    for entry in matches.flatten() {
        if entry.is_file() && is_catalog_file(&entry) {
            files.insert(entry);
            matched = true;
        }
    }
    if !matched {
        return Err(InputError::EmptyGlob(pattern.to_string()));
    }
    Ok(())
}

fn expand_directory(dir: &Path, files: &mut BTreeSet<PathBuf>) -> Result<(), InputError> {
    let entries = dir.read_dir().map_err(|source| InputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut matched = false;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && is_catalog_file(&path) {
            files.insert(path);
            matched = true;
        }
    }
    if !matched {
        return Err(InputError::EmptyDirectory(dir.to_path_buf()));
    }
    Ok(())
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn is_catalog_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
    )
}
