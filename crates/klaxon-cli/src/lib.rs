//! klaxon CLI library
//!
//! Dispatches the `init` and `gen` subcommands: scaffolding a starter
//! catalog, and driving `klaxon-codegen` over collected input files with
//! defaults taken from `klaxon.toml`.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod inputs;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use klaxon_codegen::Generator;

pub use args::{Args, Command};
pub use error::CliError;
pub use inputs::InputError;

/// Module name used when neither flag nor config supplies one.
const DEFAULT_MODULE: &str = "errors";

/// Catalog file scaffolded by `init` and read by `gen` when no inputs are
/// named.
const DEFAULT_CATALOG: &str = "errors.yaml";

const STARTER_CATALOG: &str = r#"error:
  - key: MissingParameter
    code: MissingParameter
    category: validation
    severity: error
    description: Parameter verification error
    message:
      cn: "缺少参数: %s"
      en: "Missing Parameter: %s"
"#;

/// Runs the klaxon CLI.
///
/// # Errors
///
/// Returns [`CliError`] for input collection failures, configuration
/// problems, and any catalog validation or generation failure.
pub fn run(args: &Args) -> Result<(), CliError> {
    match &args.command {
        Command::Init => init(Path::new(DEFAULT_CATALOG)),
        Command::Gen {
            inputs,
            module,
            out,
            config,
        } => generate(inputs, module.as_deref(), out.as_deref(), config.as_deref()),
    }
}

/// Writes the starter catalog unless one already exists.
///
/// An existing file is left untouched; that is a success, not an error.
fn init(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        info!(path = path.display().to_string(); "Catalog already exists, leaving it untouched");
        return Ok(());
    }

    fs::write(path, STARTER_CATALOG).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = path.display().to_string(); "Wrote starter catalog");
    Ok(())
}

fn generate(
    inputs: &[String],
    module: Option<&str>,
    out: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let config = config::load_config(config_path)?;

    let module = module
        .map(str::to_string)
        .or(config.generate.module)
        .unwrap_or_else(|| DEFAULT_MODULE.to_string());
    let out = out
        .map(Path::to_path_buf)
        .or(config.generate.out)
        .unwrap_or_else(|| PathBuf::from(&module));

    let named: Vec<String> = if inputs.is_empty() {
        vec![DEFAULT_CATALOG.to_string()]
    } else {
        inputs.to_vec()
    };
    let files = inputs::collect_inputs(&named)?;

    let report = Generator::new(&module, &out).run(&files)?;
    info!(
        entries = report.entries,
        files = report.files.len(),
        out = out.display().to_string();
        "Generated error modules"
    );
    Ok(())
}
