use crate::commands::init::InitError;
use crate::config::ConfigError;
use sessionpack_export::ExportError;
use sessionpack_model::SessionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Init(#[from] InitError),

    #[error("Failed to load session {}: {source}", .path.display())]
    Session {
        path: PathBuf,
        #[source]
        source: SessionError,
    },

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Cannot create output file {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Get a suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            CliError::Config(ConfigError::NotFound(_)) => Some(
                "Run 'sessionpack init' to create a configuration file, or drop --config to use defaults",
            ),
            CliError::Config(ConfigError::ParseError(_)) => {
                Some("Check the YAML syntax, and that export.mode is 'web-session' or 'zipped'.")
            }
            CliError::Config(_) => None,
            CliError::Init(InitError::FileExists { .. }) => {
                Some("Pass --force to overwrite the existing file.")
            }
            CliError::Init(_) => None,
            CliError::Session {
                source: SessionError::DeserializationError(_),
                ..
            } => Some("The session file must be a JSON session document."),
            CliError::Session {
                source: SessionError::Style { .. },
                ..
            } => Some("A style maps a property to values of the wrong type. Fix the style or drop the mapping."),
            CliError::Session { .. } => None,
            CliError::Export(ExportError::NoNetworkView) => {
                Some("Add at least one network view to the session before exporting.")
            }
            CliError::Export(ExportError::ResourceRootNotFound(_)) => Some(
                "Install the web viewer under resources.web_root, set SESSIONPACK_WEB_ROOT, or use --mode zipped.",
            ),
            CliError::Export(ExportError::Serialization(_)) => {
                Some("Run with --verbose to see which view or style could not be serialized.")
            }
            CliError::Export(_) => None,
            CliError::Output { .. } => {
                Some("Check that the output directory exists and is writable.")
            }
        }
    }

    /// Format error with suggestion for CLI output
    pub fn format_for_cli(&self) -> String {
        let mut output = format!("Error: {}", self);

        if let Some(suggestion) = self.suggestion() {
            output.push_str(&format!("\n\nSuggestion: {}", suggestion));
        }

        output
    }
}
