//! Parsing and validation of `netforge.toml` project configuration files.
//!
//! A project names the netlist snapshot to generate from, the module name to
//! emit, which dialects to produce and where, and lint overrides for the
//! diagnostics raised along the way.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
