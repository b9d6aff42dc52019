//! CLI for the ssd screenshot downloader.

mod commands;

use anyhow::Result;
use clap::Parser;
use ssd_core::config;
use ssd_core::site::Site;
use std::path::PathBuf;

use commands::run_fetch;

/// Top-level CLI for the ssd screenshot downloader.
#[derive(Debug, Parser)]
#[command(name = "ssd")]
#[command(about = "ssd: download a Steam profile's public screenshots", long_about = None)]
pub struct Cli {
    /// Comma-separated Steam profile names (the /id/NAME part of the
    /// profile URL, not the display name).
    pub accounts: String,

    /// Destination directory; default is ./screenshots/<account>/ per account.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Concurrent downloads (0 = one per logical CPU).
    #[arg(long, default_value = "0", value_name = "N")]
    pub jobs: usize,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let site = Site::default();

        let accounts: Vec<&str> = cli
            .accounts
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if accounts.is_empty() {
            anyhow::bail!("no account names given");
        }

        let mut succeeded = 0usize;
        for name in &accounts {
            match run_fetch(&site, &cfg, name, cli.dir.as_deref(), cli.jobs).await {
                Ok(()) => succeeded += 1,
                Err(err) => {
                    eprintln!("{name}: {err:#}");
                    tracing::error!(account = name, "account failed: {:#}", err);
                }
            }
        }

        if succeeded == 0 {
            anyhow::bail!("no account could be processed");
        }
        Ok(())
    }
}
