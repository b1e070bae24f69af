pub mod export;
pub mod init;

pub use export::{ExportOptions, run_export};
pub use init::{InitError, InitOptions, run_init};
