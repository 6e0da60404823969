// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor start-up (§4.1): spawn every peer once, in index order, with a
//! short inter-spawn delay, then register its message path with the
//! filesystem watcher. Both failure kinds here are fatal (§7).

use std::thread;
use std::time::Duration;

use thiserror::Error;
use warden_adapters::{FsWatcher, LauncherError, MessageFile, MessageFileError, ProcessLauncher, WatchError};
use warden_core::{Config, PeerId, PeerState, PeerTable};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("peer {peer}: spawn failed: {source}")]
    SpawnFailed { peer: PeerId, source: LauncherError },

    #[error("peer {peer}: failed to read startup pid: {source}")]
    PidReadFailed {
        peer: PeerId,
        source: MessageFileError,
    },

    #[error("peer {peer}: failed to register filesystem watch: {source}")]
    WatchRegistrationFailed { peer: PeerId, source: WatchError },
}

/// Spawn every configured peer in order and bring it to *starting*.
///
/// `table` and `watcher` are populated in place. Returns on the first
/// failure — a broken start-up is not something the supervisor attempts to
/// partially recover from (§4.1: both kinds are fatal at start-up).
pub fn spawn_all<L: ProcessLauncher, W: FsWatcher>(
    config: &Config,
    table: &PeerTable,
    launcher: &L,
    watcher: &mut W,
) -> Result<(), StartupError> {
    let inter_spawn_delay = Duration::from_millis(config.inter_spawn_delay_ms);

    for (idx, peer_cfg) in config.peers.iter().enumerate() {
        let id = PeerId(idx);

        launcher
            .launch(&peer_cfg.launch_command)
            .map_err(|source| StartupError::SpawnFailed { peer: id, source })?;

        let pid = MessageFile::read_pid(&peer_cfg.message_path)
            .map_err(|source| StartupError::PidReadFailed { peer: id, source })?;

        {
            let mut peer = table.lock(id);
            peer.pid = pid;
            peer.state = PeerState::Starting;
        }

        watcher
            .register(id, &peer_cfg.message_path)
            .map_err(|source| StartupError::WatchRegistrationFailed { peer: id, source })?;

        tracing::info!(peer = %id, pid, "peer spawned");

        if idx + 1 < config.peers.len() {
            thread::sleep(inter_spawn_delay);
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
