//! sessionpack CLI library.
//!
//! Exposes the command implementations behind the `sessionpack` binary so
//! they can be driven from integration tests.
//!
//! # Modules
//!
//! - [`commands`]: `init` and `export`
//! - [`config`]: `sessionpack.yaml` loading and environment overrides
//! - [`errors`]: CLI errors with suggestions
//! - [`output`]: styled terminal messages
//! - [`progress`]: progress bar for export jobs

pub mod commands;
pub mod config;
pub mod errors;
pub mod output;
pub mod progress;

pub use config::{ConfigError, ExportConfig, ResourceConfig, SessionpackConfig};
pub use errors::CliError;
pub use progress::ExportProgress;
