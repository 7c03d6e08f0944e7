//! Command-line argument definitions for the klaxon CLI.
//!
//! Arguments are parsed with [`clap`]'s derive API; doc comments double as
//! help text. The CLI has two subcommands: `init` scaffolds a starter
//! catalog, `gen` compiles catalogs into Rust modules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line arguments for the klaxon catalog tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// What the CLI should do.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter errors.yaml in the working directory
    Init,

    /// Generate Rust error modules from catalog files
    Gen {
        /// Catalog files, directories, or glob patterns (default: errors.yaml)
        #[arg(value_name = "INPUT")]
        inputs: Vec<String>,

        /// Name of the generated module
        #[arg(short, long)]
        module: Option<String>,

        /// Output directory (defaults to the module name)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Path to configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
