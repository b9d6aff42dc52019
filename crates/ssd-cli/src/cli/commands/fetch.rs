//! `ssd <accounts>` – crawl one account's listing and download its images.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use ssd_core::account::Account;
use ssd_core::config::SsdConfig;
use ssd_core::crawler;
use ssd_core::error::ScrapeError;
use ssd_core::orchestrator;
use ssd_core::progress::Progress;
use ssd_core::site::Site;

pub async fn run_fetch(
    site: &Site,
    cfg: &SsdConfig,
    name: &str,
    dir_override: Option<&Path>,
    jobs: usize,
) -> Result<()> {
    let account = match Account::new(site, name) {
        Ok(a) => a,
        Err(ScrapeError::InvalidAccount(url)) => {
            anyhow::bail!(
                "invalid account (use the profile name from https://steamcommunity.com/id/NAME/screenshots/, not the display name): {url}"
            );
        }
        Err(e) => return Err(e.into()),
    };

    let dest_dir = match dir_override {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?
            .join("screenshots")
            .join(account.name()),
    };

    // The crawl is sequential blocking I/O; keep it off the runtime.
    let listing_policy = cfg.listing_policy();
    let crawl_site = site.clone();
    let crawl_account = account.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        crawler::crawl(&crawl_site, &crawl_account, &listing_policy, |who, page| {
            println!("Fetching screenshots of {who}, page {page}");
        })
    })
    .await
    .context("crawl task join")??;

    if outcome.items.is_empty() {
        println!("No images found for {}", account.name());
        return Ok(());
    }

    println!(
        "Downloading {} images to {}, this may take a while...",
        outcome.items.len(),
        dest_dir.display()
    );

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<Progress>(16);
    let printer = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            print!(
                "\rDownloaded {}/{} images [{}%]",
                p.completed,
                p.total,
                p.percent()
            );
            let _ = std::io::stdout().flush();
        }
        println!();
    });

    let report = orchestrator::run(
        site,
        &outcome.items,
        &dest_dir,
        if jobs > 0 { jobs } else { cfg.worker_count() },
        cfg.download_policy(),
        Some(progress_tx),
    )
    .await?;

    let _ = printer.await;

    if report.failed.is_empty() {
        println!("Finished successfully");
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} images failed (ids: {:?})",
            report.failed.len(),
            report.total,
            report.failed
        );
    }
}
