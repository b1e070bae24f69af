//! Implementation of the `sessionpack init` command.
//!
//! Writes a commented `sessionpack.yaml` holding every setting at its
//! default value.
//!
//! # Usage
//!
//! ```bash
//! # Create sessionpack.yaml in current directory
//! sessionpack init
//!
//! # Specify output path
//! sessionpack init --output config/sessionpack.yaml
//!
//! # Overwrite existing file
//! sessionpack init --force
//! ```

use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::config::CONFIG_FILE;
use crate::output;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
    /// Configuration file already exists and --force was not specified.
    #[error("Configuration file already exists: {path}. Use --force to overwrite.")]
    FileExists { path: String },

    /// Failed to write the configuration file.
    #[error("Failed to write configuration file: {0}")]
    WriteError(#[from] std::io::Error),
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# sessionpack.yaml - sessionpack configuration file

# ===============================================================================
# WEB VIEWER RESOURCES
# ===============================================================================
# Web session archives bundle a static web viewer next to the exported data.
# The viewer tree is read from <web_root>/<export_type>.

resources:
  # Directory holding one viewer tree per export type
  # Supports ~ for home directory
  # Override: SESSIONPACK_WEB_ROOT
  web_root: "~/.sessionpack/web"

  # Viewer tree to bundle (a single directory name)
  # Override: SESSIONPACK_EXPORT_TYPE
  export_type: "default"

# ===============================================================================
# EXPORT DEFAULTS
# ===============================================================================

export:
  # web-session: every network and style, bundled with the web viewer
  # zipped:      networks.js and styles.js only, current style first
  # Override: SESSIONPACK_EXPORT_MODE
  mode: web-session

  # Where archives are written when --output is not given
  # Override: SESSIONPACK_OUTPUT_DIR
  output_dir: "."

  # Renderer version range recorded in each style document
  renderer_version: "~2.1"
"#;

/// Options for the `sessionpack init` command.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Output path for the configuration file.
    pub output: Option<String>,
    /// Whether to overwrite an existing file.
    pub force: bool,
}

/// Run the `sessionpack init` command.
pub fn run_init(options: InitOptions) -> Result<(), InitError> {
    let output_path = options.output.unwrap_or_else(|| CONFIG_FILE.to_string());
    let path = Path::new(&output_path);

    if path.exists() && !options.force {
        return Err(InitError::FileExists { path: output_path });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(DEFAULT_CONFIG_TEMPLATE.as_bytes())?;

    output::success(&format!("Created configuration file: {}", output_path));
    output::info("");
    output::info("Next steps:");
    output::info("  1. Install the web viewer under resources.web_root");
    output::info("  2. Run: sessionpack export --session <session.json>");

    Ok(())
}
