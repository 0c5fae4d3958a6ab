//! The reconciliation cycle loop.
//!
//! One cycle is scan -> resolve -> reconcile -> commit, run to completion
//! before the next begins. The interval between cycles is a fixed sleep,
//! not a scheduler, and a failed cycle is logged and skipped with no
//! retry.

use chrono::Utc;
use netwatch_store::{InventoryStore, ReconcileSummary};
use tokio::time::{sleep, Duration};

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::scanner::NmapScanner;
use crate::{observe, resolve};

/// Execute a single cycle against the configured network.
///
/// The store connection is opened only after the scan has produced
/// results and is dropped on every exit path, so it never spans more
/// than one reconciliation pass.
pub async fn run_cycle(scanner: &NmapScanner, config: &MonitorConfig) -> Result<ReconcileSummary> {
    let scan = scanner
        .scan(
            &config.scan.network,
            &config.scan.ports,
            config.scan.timeout_secs,
        )
        .await?;

    let scanned = observe::collect(&scan.nmap_run);
    let mut observations = Vec::with_capacity(scanned.len());
    for host in scanned {
        tracing::info!(ip = %host.ip, status = %host.status, "Found device");
        let domain = resolve::reverse_lookup(&host.ip).await;
        observations.push(host.into_observation(domain));
    }

    let mut store = InventoryStore::connect(&config.store_config()).await?;
    let summary = store.reconcile(&observations, Utc::now()).await?;
    store.close().await?;

    tracing::info!(
        scan_id = %scan.scan_id,
        network = %scan.network,
        scanned = summary.scanned,
        inserted = summary.inserted,
        updated = summary.updated,
        unchanged = summary.unchanged,
        marked_down = summary.marked_down,
        duration_ms = scan.duration.as_millis(),
        "Cycle complete"
    );

    Ok(summary)
}

/// Run cycles forever at the configured interval.
///
/// Every failure mode short of process interruption degrades to "skip
/// this cycle, try again next interval".
pub async fn run_loop(scanner: &NmapScanner, config: &MonitorConfig) -> Result<()> {
    loop {
        if let Err(e) = run_cycle(scanner, config).await {
            tracing::error!(network = %config.scan.network, error = %e, "Scan cycle failed");
        }

        tracing::info!(
            secs = config.scan.interval_secs,
            "Waiting before next scan"
        );
        sleep(Duration::from_secs(config.scan.interval_secs)).await;
    }
}
