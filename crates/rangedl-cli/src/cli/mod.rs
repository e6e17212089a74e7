//! CLI for rangedl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rangedl_core::config;
use std::path::PathBuf;

use commands::{run_clean, run_get, run_scratch_dir};

/// Top-level CLI for rangedl.
#[derive(Debug, Parser)]
#[command(name = "rangedl")]
#[command(about = "rangedl: segmented, resumable HTTP range downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL into a local file using concurrent range requests.
    Get {
        /// Direct HTTP/HTTPS URL; the server must support Range requests.
        url: String,

        /// Destination file path.
        dest: PathBuf,

        /// Number of concurrent segment fetchers (default from config).
        #[arg(short, long, value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Remove the resume cache left by a failed download into DEST.
    Clean {
        /// Destination file path the failed download was writing to.
        dest: PathBuf,
    },

    /// Print the scratch directory used for downloads into DEST.
    ScratchDir {
        /// Destination file path.
        dest: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                url,
                dest,
                concurrency,
            } => run_get(&cfg, url, dest, concurrency).await?,
            CliCommand::Clean { dest } => run_clean(&cfg, &dest)?,
            CliCommand::ScratchDir { dest } => run_scratch_dir(&cfg, &dest),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
