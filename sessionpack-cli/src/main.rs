//! sessionpack - Export graph sessions as web viewer archives.
//!
//! # Commands
//!
//! - `sessionpack init` - Write a commented configuration file
//! - `sessionpack export` - Export a session file into a zip archive
//!
//! # Usage
//!
//! ```bash
//! sessionpack init
//! sessionpack export --session analysis.json
//! sessionpack export --session analysis.json --mode zipped
//! ```

use clap::{Parser, Subcommand};
use sessionpack_cli::commands;
use sessionpack_cli::errors::CliError;
use sessionpack_cli::output;
use sessionpack_export::ExportMode;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// sessionpack - Export graph sessions as web viewer archives
#[derive(Parser)]
#[command(name = "sessionpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new sessionpack.yaml configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short)]
        output: Option<String>,

        /// Overwrite existing configuration file
        #[arg(long, short)]
        force: bool,
    },

    /// Export a session into a zip archive
    Export {
        /// Session file to export
        #[arg(long, short)]
        session: PathBuf,

        /// Export mode: web-session or zipped
        #[arg(long, short)]
        mode: Option<ExportMode>,

        /// Archive path (default: web_session.zip or networks.zip in export.output_dir)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Path to the configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Web viewer tree to bundle, overriding resources.export_type
        #[arg(long)]
        export_type: Option<String>,

        /// Only print errors
        #[arg(long, short, conflicts_with = "verbose")]
        quiet: bool,

        /// Show detailed progress
        #[arg(long, short)]
        verbose: bool,
    },
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Init { output, force } => {
            init_tracing("sessionpack=info");
            let options = commands::InitOptions { output, force };
            commands::run_init(options).map_err(CliError::from)
        }
        Commands::Export {
            session,
            mode,
            output,
            config,
            export_type,
            quiet,
            verbose,
        } => {
            output::set_quiet(quiet);
            output::set_verbosity(u8::from(verbose));
            init_tracing(if verbose {
                "sessionpack=debug"
            } else if quiet {
                "warn"
            } else {
                "sessionpack=info"
            });

            let options = commands::ExportOptions {
                session,
                mode,
                output,
                config,
                export_type,
                quiet,
            };
            commands::run_export(options).map(|_| ())
        }
    };

    if let Err(e) = result {
        output::error(&e.format_for_cli());
        std::process::exit(1);
    }
}
