//! Concurrent download orchestration.
//!
//! Fans the resolve-then-download pipeline out over a bounded worker set.
//! Each item retries independently under the download policy; completion
//! events flow to a single aggregator task that exclusively owns the
//! progress counter, so no increment can be lost or duplicated.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::downloader;
use crate::error::ScrapeError;
use crate::item::{DownloadResult, Item};
use crate::progress::Progress;
use crate::resolver;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::site::Site;

/// Final tally for one account's download phase.
#[derive(Debug)]
pub struct FetchReport {
    pub total: usize,
    pub completed: usize,
    /// Identifiers whose retry budget ran out (empty under the default
    /// unbounded policy).
    pub failed: Vec<u64>,
}

/// Downloads every item into `dest_dir`, creating it if absent.
///
/// Runs up to `workers` pipelines at once; each success sends one
/// progress snapshot through `progress_tx`. Under an unbounded policy
/// this returns only once every item is on disk.
pub async fn run(
    site: &Site,
    items: &[Item],
    dest_dir: &Path,
    workers: usize,
    policy: RetryPolicy,
    progress_tx: Option<mpsc::Sender<Progress>>,
) -> Result<FetchReport> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating {}", dest_dir.display()))?;

    let total = items.len();
    let workers = workers.max(1);

    // Aggregator: sole owner of the completed counter.
    let (done_tx, mut done_rx) = mpsc::channel::<u64>(workers.max(16));
    let aggregator = tokio::spawn(async move {
        let mut completed = 0usize;
        while let Some(id) = done_rx.recv().await {
            completed += 1;
            tracing::debug!(id, completed, total, "image finished");
            if let Some(tx) = &progress_tx {
                let _ = tx.send(Progress { completed, total }).await;
            }
        }
        completed
    });

    let site = Arc::new(site.clone());
    let mut queue = items.iter().cloned();
    let mut results: Vec<DownloadResult> = Vec::with_capacity(total);
    let mut join_set: JoinSet<Result<DownloadResult>> = JoinSet::new();

    loop {
        while join_set.len() < workers {
            let Some(item) = queue.next() else { break };
            let site = Arc::clone(&site);
            let dest = dest_dir.join(item.file_name());
            let done_tx = done_tx.clone();
            join_set.spawn(async move {
                let outcome =
                    tokio::task::spawn_blocking(move || fetch_one(&site, &item, dest, &policy))
                        .await
                        .map_err(|e| anyhow::anyhow!("download worker join: {}", e))?;
                if outcome.success {
                    let _ = done_tx.send(outcome.id).await;
                }
                Ok(outcome)
            });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        let outcome = joined.map_err(|e| anyhow::anyhow!("download task join: {}", e))??;
        results.push(outcome);
    }

    drop(done_tx);
    let completed = aggregator
        .await
        .map_err(|e| anyhow::anyhow!("progress aggregator join: {}", e))?;

    let failed: Vec<u64> = results
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.id)
        .collect();
    Ok(FetchReport {
        total,
        completed,
        failed,
    })
}

/// One item's whole pipeline: skip when already on disk, otherwise
/// resolve and download under the retry policy. Never panics; the outcome
/// carries the success flag.
fn fetch_one(site: &Site, item: &Item, dest: PathBuf, policy: &RetryPolicy) -> DownloadResult {
    if dest.exists() {
        tracing::debug!(id = item.id, "already on disk, skipping pipeline");
        return DownloadResult {
            id: item.id,
            success: true,
            path: dest,
        };
    }

    let attempt = || -> Result<(), ScrapeError> {
        let media_url = resolver::resolve(site, item)?;
        if downloader::download(&media_url, &dest) {
            Ok(())
        } else {
            Err(ScrapeError::DownloadFailed)
        }
    };

    match run_with_retry(policy, attempt) {
        Ok(()) => DownloadResult {
            id: item.id,
            success: true,
            path: dest,
        },
        Err(e) => {
            tracing::warn!(id = item.id, "image given up after retry budget: {}", e);
            DownloadResult {
                id: item.id,
                success: false,
                path: dest,
            }
        }
    }
}
