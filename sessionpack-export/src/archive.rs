//! Archive builder.
//!
//! Collects generated data files and the bundled web-viewer tree, assigns
//! each a normalized archive path, and writes them into one zip archive.
//!
//! # Layouts
//!
//! - **Web session**: data files under `web_session/data/`, resource files
//!   under `web_session/` mirroring the resource tree.
//! - **Zipped**: data files flat under `networks/`, no resources.
//!
//! Output is byte-stable: entries keep insertion order, directories are
//! walked sorted by file name, and every entry carries the same timestamp
//! and permissions.

use crate::error::ArchiveError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Top-level folder of a web session archive.
pub const SESSION_FOLDER: &str = "web_session";

/// Folder holding data files inside [`SESSION_FOLDER`].
pub const DATA_FOLDER: &str = "data";

/// Flat folder of a zipped archive.
pub const ZIPPED_FOLDER: &str = "networks";

/// Name prefix of generated network data files.
pub const NETWORKS_PREFIX: &str = "networks_";

/// Name prefix of generated style data files.
pub const STYLE_PREFIX: &str = "style_";

pub const NETWORKS_FILE: &str = "networks.js";
pub const STYLES_FILE: &str = "styles.js";

/// Where entries are placed inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveLayout {
    WebSession,
    Zipped,
}

impl ArchiveLayout {
    /// Archive path of a data file with the given canonical name.
    pub fn data_path(&self, file_name: &str) -> String {
        match self {
            ArchiveLayout::WebSession => format!("{SESSION_FOLDER}/{DATA_FOLDER}/{file_name}"),
            ArchiveLayout::Zipped => format!("{ZIPPED_FOLDER}/{file_name}"),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingEntry {
    source: PathBuf,
    archive_path: String,
}

/// Collects archive entries, then writes them in one pass.
#[derive(Debug)]
pub struct ArchiveBuilder {
    layout: ArchiveLayout,
    resource_root: Option<PathBuf>,
    entries: Vec<PendingEntry>,
    paths: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new(layout: ArchiveLayout) -> Self {
        Self {
            layout,
            resource_root: None,
            entries: Vec::new(),
            paths: HashSet::new(),
        }
    }

    /// Files under this directory are treated as bundled resources.
    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    pub fn layout(&self) -> ArchiveLayout {
        self.layout
    }

    /// Add a file, or every file below a directory.
    ///
    /// Each file is classified when added: resource files keep their path
    /// relative to the resource root, data files are renamed by prefix.
    pub fn add(&mut self, source: impl AsRef<Path>) -> Result<(), ArchiveError> {
        let source = source.as_ref();
        if source.is_dir() {
            for entry in WalkDir::new(source).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    self.add_file(entry.path())?;
                }
            }
            Ok(())
        } else {
            self.add_file(source)
        }
    }

    fn add_file(&mut self, path: &Path) -> Result<(), ArchiveError> {
        let archive_path = self.classify(path)?;
        if !self.paths.insert(archive_path.clone()) {
            return Err(ArchiveError::DuplicateEntry(archive_path));
        }
        tracing::debug!("Archive entry {} <- {}", archive_path, path.display());
        self.entries.push(PendingEntry {
            source: path.to_path_buf(),
            archive_path,
        });
        Ok(())
    }

    /// Archive path for a source file.
    pub fn classify(&self, path: &Path) -> Result<String, ArchiveError> {
        if self.layout == ArchiveLayout::WebSession {
            let relative = self
                .resource_root
                .as_deref()
                .and_then(|root| path.strip_prefix(root).ok());
            if let Some(relative) = relative {
                return Ok(format!("{SESSION_FOLDER}/{}", normalize(relative)));
            }
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let canonical = if name.starts_with(STYLE_PREFIX) {
            STYLES_FILE
        } else if name.starts_with(NETWORKS_PREFIX) {
            NETWORKS_FILE
        } else {
            return Err(ArchiveError::UnrecognizedDataFile(path.to_path_buf()));
        };
        Ok(self.layout.data_path(canonical))
    }

    /// Archive paths in write order.
    pub fn entry_paths(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.archive_path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry and return the finished writer.
    pub fn write<W: Write + Seek>(self, writer: W) -> Result<W, ArchiveError> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        let mut zip = ZipWriter::new(writer);
        for entry in &self.entries {
            let mut file = File::open(&entry.source)?;
            zip.start_file(entry.archive_path.as_str(), options)?;
            std::io::copy(&mut file, &mut zip)?;
        }
        Ok(zip.finish()?)
    }
}

/// Join path components with forward slashes.
fn normalize(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
