//! switchdevmgrd daemon entry point.
//!
//! Loads the node state on every tick and reconciles the switchdev config
//! file from it. Errors are logged and retried on the next tick.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use switchdevmgrd::{run_event_loop, run_pass, Args, DaemonConfig};

/// Initialize tracing/logging; `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}

/// Resolves on Ctrl-C. If the handler cannot be installed the daemon keeps
/// running until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting switchdevmgrd ---");

    let cfg = match DaemonConfig::try_from(args) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Node state: {}", cfg.node_state.display());
    info!("Switchdev config: {}", cfg.conf_path.display());
    match &cfg.skip_pfs {
        Some(pfs) => info!("Skip set: {:?}", pfs.iter().collect::<Vec<_>>()),
        None => info!("Skip set: PFs declared in switchdev mode"),
    }

    let mgr = cfg.build_manager();

    if cfg.once {
        return match run_pass(&mgr, &cfg).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{} failed: {:#}", mgr.daemon_name(), e);
                ExitCode::FAILURE
            }
        };
    }

    info!("Reconciling every {}s", cfg.interval.as_secs());
    let passes = run_event_loop(&mgr, &cfg, shutdown_signal()).await;

    info!("switchdevmgrd stopped after {} pass(es)", passes);
    ExitCode::SUCCESS
}
