//! Implementation of the `sessionpack export` command.
//!
//! Loads a session file, checks its styles against the renderer's lexicon,
//! and runs one export job into the output archive.
//!
//! # Usage
//!
//! ```bash
//! # Web session archive with the bundled viewer
//! sessionpack export --session analysis.json
//!
//! # Data files only
//! sessionpack export --session analysis.json --mode zipped --output out/networks.zip
//! ```

use crate::config::SessionpackConfig;
use crate::errors::CliError;
use crate::output;
use crate::progress::ExportProgress;
use sessionpack_export::{ExportJob, ExportMode, ExportReport, ExportStatus, default_output_path};
use sessionpack_model::{LexiconRegistry, Session};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Options for the `sessionpack export` command.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Session file to export.
    pub session: PathBuf,
    /// Overrides `export.mode`.
    pub mode: Option<ExportMode>,
    /// Archive path. Defaults to a mode-specific name in `export.output_dir`.
    pub output: Option<PathBuf>,
    /// Configuration file. Defaults to `./sessionpack.yaml` when present.
    pub config: Option<PathBuf>,
    /// Overrides `resources.export_type`.
    pub export_type: Option<String>,
    /// Hide the progress bar.
    pub quiet: bool,
}

/// Run the `sessionpack export` command.
///
/// The output file is removed again unless the job completes.
pub fn run_export(options: ExportOptions) -> Result<ExportReport, CliError> {
    let mut config = SessionpackConfig::load(options.config.as_deref())?;
    if let Some(export_type) = &options.export_type {
        config = config.with_export_type(export_type.as_str())?;
    }
    let mode = options.mode.unwrap_or(config.export.mode);

    let session = Session::load_from_file(&options.session).map_err(|source| CliError::Session {
        path: options.session.clone(),
        source,
    })?;
    let lexicons = LexiconRegistry::default();
    session
        .validate_styles(&lexicons.resolve(session.renderer()))
        .map_err(|source| CliError::Session {
            path: options.session.clone(),
            source,
        })?;
    output::verbose(&format!(
        "Loaded {} networks and {} styles from {}",
        session.views().len(),
        session.styles().len(),
        options.session.display()
    ));

    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config.export.output_dir, mode));
    let file = File::create(&output_path).map_err(|source| CliError::Output {
        path: output_path.clone(),
        source,
    })?;

    let job = ExportJob::new(mode)
        .with_resource_root(config.resource_dir())
        .with_renderer_version(config.export.renderer_version.clone());
    tracing::debug!("Export job {} writing {}", job.id(), output_path.display());

    let progress = if options.quiet {
        ExportProgress::hidden()
    } else {
        ExportProgress::new()
    };
    let result = job.run(&session, &lexicons, BufWriter::new(file), &progress);
    progress.finish();

    match result {
        Ok(report) if report.status == ExportStatus::Completed => {
            output::success(&format!(
                "Exported {} networks and {} styles to {}",
                session.views().len(),
                session.styles().len(),
                output_path.display()
            ));
            for entry in &report.entries {
                output::verbose(&format!("  {}", entry));
            }
            Ok(report)
        }
        Ok(report) => {
            remove_output(&output_path);
            output::warning("Export cancelled, nothing was written");
            Ok(report)
        }
        Err(e) => {
            remove_output(&output_path);
            Err(e.into())
        }
    }
}

fn remove_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!("Failed to remove {}: {}", path.display(), e);
    }
}
