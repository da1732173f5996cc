//! Periodic reconciliation loop of the daemon.

use std::future::Future;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::DaemonConfig;
use crate::switchdev_mgr::{load_node_state, SwitchdevMgr};

/// Runs one reconciliation pass.
pub async fn run_pass(mgr: &SwitchdevMgr, cfg: &DaemonConfig) -> anyhow::Result<()> {
    let state = load_node_state(&cfg.node_state)
        .with_context(|| format!("loading node state from {}", cfg.node_state.display()))?;

    let outcome = mgr.reconcile(&state).await.context("reconciling switchdev config")?;

    info!(
        updated = outcome.updated,
        interfaces = outcome.interfaces,
        switchdev_requested = outcome.switchdev_requested,
        switchdev_present = outcome.switchdev_present,
        hw_offload = outcome.hw_offload_enabled,
        "Reconciliation pass complete"
    );
    if outcome.switchdev_present && !outcome.hw_offload_enabled {
        warn!("Switchdev PFs present but OVS hw-offload is disabled");
    }
    Ok(())
}

/// Reconciles every `cfg.interval` until `shutdown` resolves.
///
/// `shutdown` is polled for the whole lifetime of the loop, so a signal
/// raised while a pass is running stops the loop once that pass returns.
/// Returns the number of passes run.
pub async fn run_event_loop<F>(mgr: &SwitchdevMgr, cfg: &DaemonConfig, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(cfg.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut passes = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            _ = ticker.tick() => {
                passes += 1;
                if let Err(e) = run_pass(mgr, cfg).await {
                    error!("Reconciliation pass failed: {:#}", e);
                }
            }
        }
    }
    passes
}
