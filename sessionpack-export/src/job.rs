//! Export orchestrator.
//!
//! An [`ExportJob`] runs in four phases, reporting progress after each:
//!
//! 1. start (0.1): snapshot the session, write `networks.js`
//! 2. networks written (0.7): write `styles.js`
//! 3. styles written (0.9): build the archive
//! 4. archive complete (1.0): copy it to the destination
//!
//! Cancellation is checked between phases and between each view or style.
//! Generated data files are scoped temp files, and the archive is spooled to
//! an anonymous temp file, so a failed or cancelled job writes nothing to the
//! destination and leaves nothing behind.

use crate::archive::{ArchiveBuilder, ArchiveLayout, NETWORKS_PREFIX, STYLE_PREFIX};
use crate::error::ExportError;
use crate::progress::ProgressMonitor;
use crate::serializers::{NetworkSerializer, NetworksScript, StyleSerializer, write_styles_script};
use crate::snapshot::SessionSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sessionpack_model::{LexiconRegistry, Session};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Renderer version range written into style documents by default.
pub const DEFAULT_RENDERER_VERSION: &str = "~2.1";

const DATA_SUFFIX: &str = ".js";

/// Which views and styles are exported, and how the archive is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// Every view and style, bundled with the web viewer
    #[default]
    WebSession,

    /// Data files only, current style first
    Zipped,
}

impl ExportMode {
    pub fn layout(&self) -> ArchiveLayout {
        match self {
            ExportMode::WebSession => ArchiveLayout::WebSession,
            ExportMode::Zipped => ArchiveLayout::Zipped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportMode::WebSession => "web-session",
            ExportMode::Zipped => "zipped",
        }
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web-session" | "web_session" | "websession" => Ok(ExportMode::WebSession),
            "zipped" | "zip" => Ok(ExportMode::Zipped),
            other => Err(format!(
                "unknown export mode '{other}' (expected 'web-session' or 'zipped')"
            )),
        }
    }
}

/// Shared flag a host sets to stop a running job.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a job ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Completed,
    Cancelled,
}

/// Outcome of one export job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub job_id: Uuid,
    pub mode: ExportMode,
    pub status: ExportStatus,

    /// Archive entry paths, empty unless completed
    pub entries: Vec<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExportReport {
    pub fn is_completed(&self) -> bool {
        self.status == ExportStatus::Completed
    }
}

/// One user-initiated export.
#[derive(Debug, Clone)]
pub struct ExportJob {
    id: Uuid,
    mode: ExportMode,
    resource_root: Option<PathBuf>,
    renderer_version: String,
    scratch_dir: Option<PathBuf>,
    cancel: CancellationToken,
}

impl ExportJob {
    pub fn new(mode: ExportMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            resource_root: None,
            renderer_version: DEFAULT_RENDERER_VERSION.to_string(),
            scratch_dir: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Directory of the bundled web viewer. Required in web session mode.
    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    pub fn with_renderer_version(mut self, version: impl Into<String>) -> Self {
        self.renderer_version = version.into();
        self
    }

    /// Directory for temp files; the system temp directory when unset.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> ExportMode {
        self.mode
    }

    /// Token that cancels this job; clone it before calling [`ExportJob::run`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the job to completion or cancellation.
    ///
    /// The destination is owned by the job and dropped exactly once before
    /// returning. It receives the archive only if every phase succeeds.
    pub fn run<W: Write>(
        &self,
        session: &Session,
        lexicons: &LexiconRegistry,
        mut destination: W,
        monitor: &dyn ProgressMonitor,
    ) -> Result<ExportReport, ExportError> {
        let started_at = Utc::now();
        tracing::info!("Starting {} export job {}", self.mode, self.id);

        if session.views().is_empty() {
            return Err(ExportError::NoNetworkView);
        }
        let resource_root = self.resource_root()?;
        let snapshot = SessionSnapshot::capture(session, lexicons, self.mode);

        monitor.set_title("Archiving into zip files");
        monitor.set_progress(0.1);

        // Phase 1: networks
        monitor.set_status("Saving networks as JSON...");
        let Some(networks_file) = self.write_networks(&snapshot)? else {
            return Ok(self.cancelled(started_at));
        };
        monitor.set_progress(0.7);
        if self.cancel.is_cancelled() {
            return Ok(self.cancelled(started_at));
        }

        // Phase 2: styles
        monitor.set_status("Saving visual styles as JSON...");
        let Some(styles_file) = self.write_styles(&snapshot)? else {
            return Ok(self.cancelled(started_at));
        };
        monitor.set_progress(0.9);
        if self.cancel.is_cancelled() {
            return Ok(self.cancelled(started_at));
        }

        // Phase 3: archive
        monitor.set_status("Writing archive...");
        let mut builder = ArchiveBuilder::new(self.mode.layout());
        if let Some(root) = &resource_root {
            builder = builder.with_resource_root(root);
        }
        builder.add(networks_file.path())?;
        builder.add(styles_file.path())?;
        if let Some(root) = &resource_root {
            builder.add(root)?;
        }
        let entries = builder.entry_paths();
        let mut spool = builder.write(self.spool_file()?)?;
        drop(networks_file);
        drop(styles_file);

        if self.cancel.is_cancelled() {
            return Ok(self.cancelled(started_at));
        }

        // Phase 4: hand over
        spool.seek(SeekFrom::Start(0))?;
        std::io::copy(&mut spool, &mut destination)?;
        destination.flush()?;
        drop(destination);

        monitor.set_status("Done.");
        monitor.set_progress(1.0);
        tracing::info!(
            "Export job {} completed with {} entries",
            self.id,
            entries.len()
        );

        Ok(ExportReport {
            job_id: self.id,
            mode: self.mode,
            status: ExportStatus::Completed,
            entries,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn resource_root(&self) -> Result<Option<PathBuf>, ExportError> {
        if self.mode != ExportMode::WebSession {
            return Ok(None);
        }
        let root = self
            .resource_root
            .as_ref()
            .ok_or(ExportError::MissingResourceRoot)?;
        if !root.is_dir() {
            return Err(ExportError::ResourceRootNotFound(root.clone()));
        }

        // Temp files written below the root would be walked as resources.
        let scratch = match &self.scratch_dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir(),
        };
        let scratch = scratch.canonicalize()?;
        if scratch.starts_with(root.canonicalize()?) {
            return Err(ExportError::ScratchInsideResourceRoot(scratch));
        }
        Ok(Some(root.clone()))
    }

    /// `None` when cancelled part way.
    fn write_networks(&self, snapshot: &SessionSnapshot) -> Result<Option<NamedTempFile>, ExportError> {
        let mut file = self.data_file(NETWORKS_PREFIX)?;
        let serializer = NetworkSerializer::new(&snapshot.lexicon);

        let mut script = NetworksScript::begin(BufWriter::new(file.as_file_mut()))?;
        for view in &snapshot.views {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }
            let document = serializer.build_document(view)?;
            script.push(view.name(), &document)?;
        }
        script.finish()?;

        tracing::debug!("Wrote {} networks to {}", snapshot.views.len(), file.path().display());
        Ok(Some(file))
    }

    /// `None` when cancelled part way.
    fn write_styles(&self, snapshot: &SessionSnapshot) -> Result<Option<NamedTempFile>, ExportError> {
        let serializer = StyleSerializer::new(&snapshot.lexicon, self.renderer_version.clone());

        let mut documents = Vec::with_capacity(snapshot.styles.len());
        for style in &snapshot.styles {
            if self.cancel.is_cancelled() {
                return Ok(None);
            }
            documents.push(serializer.build_document(style)?);
            tracing::debug!("Serialized style '{}'", style.name());
        }

        let mut file = self.data_file(STYLE_PREFIX)?;
        write_styles_script(BufWriter::new(file.as_file_mut()), &documents)?;
        Ok(Some(file))
    }

    fn data_file(&self, prefix: &str) -> Result<NamedTempFile, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix).suffix(DATA_SUFFIX);
        let file = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file)
    }

    fn spool_file(&self) -> Result<std::fs::File, ExportError> {
        let file = match self.scratch_dir.as_deref() {
            Some(dir) => tempfile::tempfile_in(dir)?,
            None => tempfile::tempfile()?,
        };
        Ok(file)
    }

    fn cancelled(&self, started_at: DateTime<Utc>) -> ExportReport {
        tracing::info!("Export job {} cancelled", self.id);
        ExportReport {
            job_id: self.id,
            mode: self.mode,
            status: ExportStatus::Cancelled,
            entries: Vec::new(),
            started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Default archive file name for a mode.
pub fn default_file_name(mode: ExportMode) -> &'static str {
    match mode {
        ExportMode::WebSession => "web_session.zip",
        ExportMode::Zipped => "networks.zip",
    }
}

/// Default archive path inside an output directory.
pub fn default_output_path(output_dir: &Path, mode: ExportMode) -> PathBuf {
    output_dir.join(default_file_name(mode))
}
