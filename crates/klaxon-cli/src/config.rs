//! Configuration file loading for the CLI.
//!
//! Finds and loads `klaxon.toml` from the usual places (explicit path, the
//! working directory, the platform config directory) and falls back to
//! defaults when nothing is found. Command-line flags always win over the
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use crate::error::CliError;

const CONFIG_FILE: &str = "klaxon.toml";

/// Contents of a `klaxon.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Defaults for the `gen` subcommand.
    pub generate: GenerateConfig,
}

/// `[generate]` section: defaults applied when the matching flag is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Generated module name.
    pub module: Option<String>,

    /// Output directory.
    pub out: Option<PathBuf>,
}

/// Finds and loads configuration.
///
/// Search order:
/// 1. Explicit path if provided (an error when it does not exist)
/// 2. `klaxon.toml` in the working directory
/// 3. The platform-specific config directory
/// 4. Built-in defaults
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        if !path.exists() {
            return Err(CliError::ConfigMissing(path.to_path_buf()));
        }
        return load_config_file(path);
    }

    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        info!(path = local.display().to_string(); "Loading configuration from local path");
        return load_config_file(local);
    }

    if let Some(proj_dirs) = ProjectDirs::from("rs", "klaxon", "klaxon") {
        let system = proj_dirs.config_dir().join(CONFIG_FILE);
        if system.exists() {
            info!(path = system.display().to_string(); "Loading configuration from system path");
            return load_config_file(&system);
        }
        debug!(path = system.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(CliConfig::default())
}

fn load_config_file(path: &Path) -> Result<CliConfig, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
