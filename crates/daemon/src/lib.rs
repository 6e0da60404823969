// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! warden-daemon: the three control loops (watchdog, ingest, restart) and
//! the start-up/shutdown glue that ties them to `warden-core`'s data model
//! and `warden-adapters`' OS collaborators.
//!
//! Nothing outside this crate schedules a thread or touches the shared
//! `PeerTable` concurrently — `run_supervisor` below is the one place that
//! assembles the three loops and the `Arc`s they share.

pub mod ingest;
pub mod restart;
pub mod shutdown;
pub mod startup;
pub mod watchdog;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use warden_adapters::{
    FsWatcher, ProcessKiller, ProcessLauncher, RealFsWatcher, ShellLauncher, SignalKiller,
    WatchError,
};
use warden_core::{Config, PeerTable};

use shutdown::ShutdownFlag;
use startup::StartupError;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("failed to install signal handlers: {0}")]
    SignalHandlers(#[source] std::io::Error),

    #[error("failed to initialize the filesystem watcher: {0}")]
    WatcherInit(#[source] WatchError),

    #[error("failed to spawn {loop_name} thread: {source}")]
    ThreadSpawn {
        loop_name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Bring up the supervisor end to end: spawn every peer (§4.1), then run the
/// watchdog, ingest, and restart-fallback loops until `shutdown` is set,
/// joining all three before returning.
///
/// Generic over the process-control collaborators so tests can substitute
/// `Fake*` adapters; [`run_supervisor`] is the concrete, production-wired
/// entry point `wardend`'s `main` calls.
pub fn run_supervisor_with<W: FsWatcher, L: ProcessLauncher + Clone + 'static, K: ProcessKiller>(
    config: Config,
    mut watcher: W,
    launcher: L,
    killer: K,
) -> Result<(), SupervisorError> {
    let config = Arc::new(config);
    let table = Arc::new(PeerTable::from_config(&config));
    let shutdown = ShutdownFlag::new();

    shutdown::install_signal_handlers(shutdown.clone()).map_err(SupervisorError::SignalHandlers)?;

    startup::spawn_all(&config, &table, &launcher, &mut watcher)?;

    let tick = Duration::from_millis(config.tick_ms);
    let restart_sweep = Duration::from_millis(config.restart_sweep_ms);

    // All three loops get their own real-time-scheduled thread (§5) — ingest
    // is not special-cased onto the calling thread, since that would run it
    // at whatever priority `run_supervisor_with`'s caller happens to have.
    let watchdog_handle = watchdog::spawn(Arc::clone(&table), killer, tick, shutdown.clone())
        .map_err(|source| SupervisorError::ThreadSpawn {
            loop_name: "watchdog",
            source,
        })?;

    let ingest_handle = ingest::spawn(
        Arc::clone(&config),
        Arc::clone(&table),
        watcher,
        launcher.clone(),
        shutdown.clone(),
    )
    .map_err(|source| SupervisorError::ThreadSpawn {
        loop_name: "ingest",
        source,
    })?;

    let restart_sweep_handle = restart::spawn_fallback_sweep(
        Arc::clone(&config),
        Arc::clone(&table),
        launcher,
        restart_sweep,
        shutdown,
    )
    .map_err(|source| SupervisorError::ThreadSpawn {
        loop_name: "restart-sweep",
        source,
    })?;

    let _ = watchdog_handle.join();
    let _ = ingest_handle.join();
    let _ = restart_sweep_handle.join();
    Ok(())
}

/// Production entry point: real shell launcher, `SIGTERM` killer, and
/// `notify`-backed filesystem watcher.
pub fn run_supervisor(config: Config) -> Result<(), SupervisorError> {
    let watcher = RealFsWatcher::new().map_err(SupervisorError::WatcherInit)?;
    run_supervisor_with(config, watcher, ShellLauncher::new(), SignalKiller::new())
}
