// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use railyard_adapters::{
    ClaudeOracleAdapter, DesktopNotifyAdapter, GitEngineCollaborator, GitVcsAdapter, NoopOrchestratorAdapter,
};
use railyard_daemon::{config, daemon_loop, error::DaemonError, lifecycle, Adapters, Config};
use railyard_yardmaster::{defaults, Rebalancer};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

/// Heartbeat cadence: well under the liveness sweep's staleness threshold so
/// a live engine never gets mistaken for dead between two heartbeats.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: railyardd <config.toml>");
            std::process::exit(1);
        }
    };

    let config = Config::load(Path::new(&config_path))?;
    let log_guard = setup_logging(&config)?;

    info!("starting railyard daemon");

    let daemon = match lifecycle::startup(config) {
        Ok(d) => d,
        Err(DaemonError::LockFailed(path, _)) => {
            eprintln!("railyardd is already running against {}", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            drop(log_guard);
            return Err(e.into());
        }
    };

    let collaborator = GitEngineCollaborator::new();
    let ym_dir = daemon_loop::resolve_switch_dir(&collaborator, &daemon.config.repo_dir).await;

    let adapters = Adapters {
        vcs: GitVcsAdapter::new(),
        notify: DesktopNotifyAdapter::new(),
        orchestrator: NoopOrchestratorAdapter::new(),
        oracle: ClaudeOracleAdapter::new(),
        collaborator: collaborator.clone(),
    };

    let mut heartbeat_errors = collaborator.start_heartbeat(
        Arc::clone(&daemon.store),
        defaults::YARDMASTER_ID.to_string(),
        HEARTBEAT_INTERVAL,
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut poll = tokio::time::interval(daemon.config.poll_interval);
    let mut rebalancer = Rebalancer::new();
    let daemon_start_ms = daemon.store.now();

    loop {
        tokio::select! {
            _ = poll.tick() => {
                let now_ms = daemon.store.now();
                let outcome = daemon_loop::tick(
                    &daemon.store,
                    &daemon.config,
                    &ym_dir,
                    &adapters,
                    &mut rebalancer,
                    daemon_start_ms,
                    now_ms,
                )
                .await;

                match outcome {
                    Ok(railyard_yardmaster::DispatchOutcome::Draining) => {
                        info!("draining, shutting down");
                        break;
                    }
                    Ok(railyard_yardmaster::DispatchOutcome::Continue) => {}
                    Err(e) => error!(error = %e, "daemon tick failed"),
                }
            }

            Some(e) = heartbeat_errors.recv() => {
                warn!(error = %e, "heartbeat failed");
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, draining");
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, draining");
                break;
            }
        }
    }

    lifecycle::shutdown(&daemon);
    info!("railyard daemon stopped");
    Ok(())
}

fn setup_logging(config: &config::Config) -> Result<tracing_appender::non_blocking::WorkerGuard, DaemonError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path().parent().ok_or(DaemonError::NoStateDir)?,
        config.log_path().file_name().ok_or(DaemonError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
