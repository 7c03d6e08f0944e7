//! The CLI's error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use klaxon_codegen::CodegenError;

use crate::inputs::InputError;

/// Everything that can make a CLI run fail.
///
/// Each variant maps to a nonzero exit with a rendered diagnostic; see
/// `error_adapter` for the miette side.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input collection failed before generation started.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The generator rejected or failed to process the catalogs.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// An explicitly requested configuration file does not exist.
    #[error("missing configuration file `{}`", .0.display())]
    ConfigMissing(PathBuf),

    /// A configuration file exists but is not valid TOML.
    #[error("failed to parse configuration `{}`", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A filesystem operation outside the generator failed.
    #[error("failed to access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
