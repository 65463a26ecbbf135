//! CLI for the wdl model downloader.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use wdl_core::config::{self, WdlConfig};

use commands::{run_fetch, run_get, run_list, run_url};

/// Top-level CLI for the wdl model downloader.
#[derive(Debug, Parser)]
#[command(name = "wdl")]
#[command(about = "wdl: parallel downloader for whisper.cpp ggml models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Flags shared by every command that downloads.
#[derive(Debug, Clone, Default, Args)]
pub struct TransferArgs {
    /// Output folder (default: config `output_dir`, then the current directory).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds (default 1800).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Do not print progress.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl TransferArgs {
    /// Flags win over the config file.
    pub fn apply(&self, cfg: &mut WdlConfig) {
        if let Some(out) = &self.out {
            cfg.output_dir = Some(out.clone());
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        cfg.quiet |= self.quiet;
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a model by name (e.g. ggml-medium.en) unless already present.
    Fetch {
        /// Model name; `.bin` is appended when missing.
        #[arg(default_value = "ggml-medium")]
        model: String,

        #[command(flatten)]
        transfer: TransferArgs,
    },

    /// Download an arbitrary URL with parallel range requests.
    Get {
        /// Direct HTTP/HTTPS URL to download.
        url: String,

        #[command(flatten)]
        transfer: TransferArgs,
    },

    /// Print the source URL of a model.
    Url {
        /// Model name.
        model: String,
    },

    /// List known models and whether each is present locally.
    List {
        /// Folder to look in (default: config `output_dir`, then the current directory).
        #[arg(long, short = 'o', value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch { model, transfer } => {
                transfer.apply(&mut cfg);
                run_fetch(&cfg, &model).await?;
            }
            CliCommand::Get { url, transfer } => {
                transfer.apply(&mut cfg);
                run_get(&cfg, &url).await?;
            }
            CliCommand::Url { model } => run_url(&cfg, &model)?,
            CliCommand::List { out } => {
                if out.is_some() {
                    cfg.output_dir = out;
                }
                run_list(&cfg)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
