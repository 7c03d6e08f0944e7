//! Catalog-driven structured errors.
//!
//! Klaxon separates what an error *is* from how it is *shown*. Error kinds
//! are declared once as [`Definition`]s in a [`Registry`]; code raises
//! lightweight [`Fault`]s by key, and the presentation side localizes,
//! formats, and routes them without the raising code knowing anything about
//! languages or output shapes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use klaxon::{Context, Definition, Fault, Localizer, Registry, Severity};
//!
//! let registry = Arc::new(Registry::new());
//! registry.register(
//!     Definition::new("MissingParameter", "E1001")
//!         .with_category("validation")
//!         .with_severity(Severity::Warning)
//!         .with_message("en", "Missing Parameter: %s")
//!         .with_message("cn", "缺少参数: %s"),
//! )?;
//!
//! let fault = Fault::new("MissingParameter").args(["UserId"]);
//!
//! let localizer = Localizer::new(registry);
//! let cx = Context::new().with_language("cn");
//! assert_eq!(localizer.localize(&cx, &fault), "缺少参数: UserId");
//! # Ok::<(), klaxon::RegistryError>(())
//! ```
//!
//! Catalogs are usually not written by hand: the companion `klaxon-codegen`
//! crate turns YAML catalog files into modules of registration and
//! constructor functions over this crate.

mod context;
mod definition;
mod fault;
mod format;
mod localize;
mod process;
mod registry;
pub mod template;

pub use context::Context;
pub use definition::{Definition, ParseSeverityError, Severity};
pub use fault::Fault;
pub use format::{FormatMode, FormatOptions, Formatter, ParseFormatModeError, Rendered};
pub use localize::Localizer;
pub use process::{Handler, Middleware, Next, ProcessorEngine};
pub use registry::{Registry, RegistryError};

/// Metadata value type, re-exported so callers and generated code need not
/// depend on `serde_json` directly.
pub use serde_json::Value;
