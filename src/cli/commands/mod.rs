//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod compare;
mod config_cmd;
mod terms;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "lexi")]
#[command(about = "Extract terms from a master document and find them across other documents")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// List the terms extracted from a master file
    Terms {
        /// Master file
        file: PathBuf,
        /// Declared MIME type (detected from the file if omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the master file's terms across files
    Compare {
        /// Master file supplying the terms
        #[arg(short, long)]
        master: PathBuf,
        /// Files to search
        files: Vec<PathBuf>,
        /// MIME type of the master file (detected if omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Only use these extracted terms (comma-separated)
        #[arg(long)]
        only: Option<String>,
        /// Drop these extracted terms (comma-separated)
        #[arg(long)]
        exclude: Option<String>,
        /// Extra terms to search for (comma-separated)
        #[arg(long)]
        manual: Option<String>,
        /// Ignore extracted terms; search only the manual terms
        #[arg(long)]
        no_extracted: bool,
        /// Write the matrix as CSV, whatever the file extension (default path from config)
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        csv: Option<Option<PathBuf>>,
        /// Print the full report as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Show matching lines for every found term
        #[arg(long)]
        context: bool,
        /// Number of files scanned concurrently
        #[arg(short, long)]
        workers: Option<usize>,
        /// Do not search the master file itself
        #[arg(long)]
        exclude_master: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration as JSON
    Show,
    /// Write a default config file
    Init {
        /// Output file (default: lexicompare.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from_path(path)
            .await
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?,
        None => Config::load().await,
    };
    if let Some(ref path) = config.source_path {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Commands::Terms { file, mime, json } => {
            terms::cmd_terms(&config, &file, mime.as_deref(), json).await
        }
        Commands::Compare {
            master,
            files,
            mime,
            only,
            exclude,
            manual,
            no_extracted,
            csv,
            json,
            context,
            workers,
            exclude_master,
        } => {
            let options = compare::CompareOptions {
                mime,
                only,
                exclude,
                manual,
                no_extracted,
                csv,
                json,
                context,
                workers,
                exclude_master,
            };
            compare::cmd_compare(&config, &master, &files, options).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
            ConfigCommands::Init { output, force } => {
                config_cmd::cmd_config_init(output.as_deref(), force).await
            }
        },
    }
}
