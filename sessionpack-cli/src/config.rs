//! Configuration loading and validation for sessionpack.
//!
//! `sessionpack.yaml` tells the exporter where the bundled web viewer lives
//! and where archives go. The file is optional: when it is absent every
//! setting takes its default.
//!
//! # Environment Variable Overrides
//!
//! - `SESSIONPACK_WEB_ROOT`: directory holding one viewer tree per export type
//! - `SESSIONPACK_EXPORT_TYPE`: viewer tree to bundle
//! - `SESSIONPACK_EXPORT_MODE`: `web-session` or `zipped`
//! - `SESSIONPACK_OUTPUT_DIR`: directory for archives without `--output`

use serde::{Deserialize, Serialize};
use sessionpack_export::{DEFAULT_RENDERER_VERSION, ExportMode};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "sessionpack.yaml";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse the YAML configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root of `sessionpack.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionpackConfig {
    #[serde(default)]
    pub resources: ResourceConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Where the bundled web viewer is found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Directory holding one viewer tree per export type.
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,

    /// Name of the viewer tree under `web_root`.
    #[serde(default = "default_export_type")]
    pub export_type: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            export_type: default_export_type(),
        }
    }
}

fn default_web_root() -> PathBuf {
    PathBuf::from("~/.sessionpack/web")
}

fn default_export_type() -> String {
    "default".to_string()
}

/// Export defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub mode: ExportMode,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Renderer version range written into style documents.
    #[serde(default = "default_renderer_version")]
    pub renderer_version: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            mode: ExportMode::default(),
            output_dir: default_output_dir(),
            renderer_version: default_renderer_version(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_renderer_version() -> String {
    DEFAULT_RENDERER_VERSION.to_string()
}

impl SessionpackConfig {
    /// Load `./sessionpack.yaml`, or defaults when it does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            return Self::load_from_path(path);
        }
        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Self::default().finalize(env_lookup)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: SessionpackConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        config.finalize(env_lookup)
    }

    /// Load from `path` when given, otherwise from the current directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_default(),
        }
    }

    fn finalize(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        self.apply_overrides(lookup)?;
        self.expand_paths()?;
        self.validate()?;
        Ok(self)
    }

    /// Apply `SESSIONPACK_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(root) = lookup("SESSIONPACK_WEB_ROOT") {
            self.resources.web_root = PathBuf::from(root);
        }

        if let Some(export_type) = lookup("SESSIONPACK_EXPORT_TYPE") {
            self.resources.export_type = export_type;
        }

        if let Some(mode) = lookup("SESSIONPACK_EXPORT_MODE") {
            self.export.mode = mode.parse().map_err(ConfigError::ValidationError)?;
        }

        if let Some(dir) = lookup("SESSIONPACK_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Expand `~` in paths to the home directory.
    fn expand_paths(&mut self) -> Result<(), ConfigError> {
        let needs_home = [&self.resources.web_root, &self.export.output_dir]
            .iter()
            .any(|p| p.starts_with("~"));
        if !needs_home {
            return Ok(());
        }

        let home = dirs::home_dir().ok_or_else(|| {
            ConfigError::ValidationError("Cannot determine home directory".into())
        })?;
        self.resources.web_root = expand_home(&self.resources.web_root, &home);
        self.export.output_dir = expand_home(&self.export.output_dir, &home);
        Ok(())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let export_type = self.resources.export_type.as_str();
        let single_segment = !export_type.is_empty()
            && export_type != "."
            && export_type != ".."
            && !export_type.contains(['/', '\\']);
        if !single_segment {
            return Err(ConfigError::ValidationError(format!(
                "resources.export_type must be a single directory name, got '{}'",
                export_type
            )));
        }

        if self.export.renderer_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.renderer_version must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Select a different viewer tree, as `--export-type` does.
    pub fn with_export_type(mut self, export_type: impl Into<String>) -> Result<Self, ConfigError> {
        self.resources.export_type = export_type.into();
        self.validate()?;
        Ok(self)
    }

    /// Viewer tree bundled into web session archives.
    pub fn resource_dir(&self) -> PathBuf {
        self.resources.web_root.join(&self.resources.export_type)
    }
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
