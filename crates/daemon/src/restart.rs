// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart loop (§4.4): re-launch any peer in *terminated* and bring it back
//! to *starting*. Invoked synchronously after each ingest batch, and on a
//! low-frequency fallback sweep so restart latency is bounded even when the
//! whole peer set is simultaneously idle (§9).

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use warden_adapters::{LauncherError, MessageFile, MessageFileError, ProcessLauncher};
use warden_core::{Config, PeerId, PeerState, PeerTable};

use crate::shutdown::ShutdownFlag;

/// Scan every peer once, in index order, and restart those in *terminated*.
///
/// A peer that fails to spawn or whose PID can't be read is left in
/// *terminated* and retried on the next pass (§4.4, §7) — this function
/// never returns an error for an individual peer's failure, only logs it.
pub fn run_pass<L: ProcessLauncher>(config: &Config, table: &PeerTable, launcher: &L) {
    for (idx, peer_cfg) in config.peers.iter().enumerate() {
        let id = PeerId(idx);

        let needs_restart = { table.lock(id).state == PeerState::Terminated };
        if !needs_restart {
            continue;
        }

        if let Err(error) = restart_one(id, peer_cfg, table, launcher) {
            tracing::warn!(peer = %id, %error, "restart attempt failed, will retry next pass");
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RestartError {
    #[error("spawn failed: {0}")]
    Spawn(#[from] LauncherError),
    #[error("pid read failed: {0}")]
    PidRead(#[from] MessageFileError),
}

fn restart_one<L: ProcessLauncher>(
    id: PeerId,
    peer_cfg: &warden_core::PeerConfig,
    table: &PeerTable,
    launcher: &L,
) -> Result<(), RestartError> {
    launcher.launch(&peer_cfg.launch_command)?;
    let pid = MessageFile::read_pid(&peer_cfg.message_path)?;

    let mut peer = table.lock(id);
    peer.pid = pid;
    peer.state = PeerState::Starting;
    tracing::info!(peer = %id, pid, "peer restarted");
    Ok(())
}

/// Run the fallback sweep on its own OS thread at the restart loop's
/// priority (§5), invoking [`run_pass`] every `interval` until shutdown.
pub fn spawn_fallback_sweep<L: ProcessLauncher + Send + 'static>(
    config: Arc<Config>,
    table: Arc<PeerTable>,
    launcher: L,
    interval: Duration,
    shutdown: ShutdownFlag,
) -> std::io::Result<thread::JoinHandle<()>> {
    warden_adapters::spawn_with_priority(
        "warden-restart-sweep",
        warden_adapters::LoopPriority::Restart,
        move || {
            while !shutdown.is_set() {
                thread::sleep(interval);
                run_pass(&config, &table, &launcher);
            }
        },
    )
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
