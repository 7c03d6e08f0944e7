//! Error adapter for converting [`CliError`] to miette diagnostics.
//!
//! The libraries report plain `std::error::Error` values; this adapter gives
//! them diagnostic codes and help text so the CLI can render them with
//! miette's graphical report handler. Aggregated validation failures list
//! every issue in the help block, not just the first.

use std::error::Error as StdError;
use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use klaxon_codegen::CodegenError;

use crate::error::CliError;

/// Adapter implementing [`MietteDiagnostic`] over the CLI error type.
pub struct ErrorAdapter(pub CliError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for ErrorAdapter {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        StdError::source(&self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CliError::Input(_) => "klaxon::input",
            CliError::Codegen(CodegenError::Io { .. }) => "klaxon::io",
            CliError::Codegen(CodegenError::Parse { .. }) => "klaxon::catalog",
            CliError::Codegen(CodegenError::Validation(_)) => "klaxon::validation",
            CliError::Codegen(CodegenError::Generation(_)) => "klaxon::generation",
            CliError::ConfigMissing(_) | CliError::ConfigParse { .. } => "klaxon::config",
            CliError::Io { .. } => "klaxon::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: String = match &self.0 {
            CliError::Codegen(CodegenError::Validation(validation)) => validation
                .issues()
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            CliError::Codegen(CodegenError::Generation(_)) => {
                "this is a bug in klaxon-codegen; please report it".to_string()
            }
            CliError::Input(_) => {
                "run `klaxon init` to scaffold a starter errors.yaml".to_string()
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
