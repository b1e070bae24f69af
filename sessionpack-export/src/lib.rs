//! Session export pipeline for sessionpack.
//!
//! This crate turns an open [`Session`](sessionpack_model::Session) into a
//! self-contained archive a web graph viewer can load.
//!
//! # Overview
//!
//! - **Serializers**: style documents, network/view documents and the
//!   `networks.js` / `styles.js` script wrappers
//! - **Archive**: path classification and deterministic zip output
//! - **Job**: the four-phase orchestrator with progress and cancellation
//!
//! # Archive layouts
//!
//! ```text
//! web session                      zipped
//! web_session/                     networks/
//!   data/networks.js                 networks.js
//!   data/styles.js                   styles.js
//!   index.html ... (viewer files)
//! ```
//!
//! # Modules
//!
//! - [`serializers`]: JSON documents and script wrappers
//! - [`archive`]: archive builder
//! - [`job`]: export job, modes, reports and cancellation
//! - [`snapshot`]: job-local copy of the session registries
//! - [`progress`]: progress monitor trait

pub mod archive;
pub mod error;
pub mod job;
pub mod progress;
pub mod serializers;
pub mod snapshot;

pub use archive::{ArchiveBuilder, ArchiveLayout};
pub use error::{ArchiveError, ExportError, SerializationError};
pub use job::{
    CancellationToken, DEFAULT_RENDERER_VERSION, ExportJob, ExportMode, ExportReport,
    ExportStatus, default_file_name, default_output_path,
};
pub use progress::{NullMonitor, ProgressMonitor};
pub use serializers::{NetworkJson, NetworkSerializer, StyleDocument, StyleSerializer};
pub use snapshot::{SessionSnapshot, current_style_first};
