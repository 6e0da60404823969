// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared peer table: one [`parking_lot::Mutex`] per peer, never
//! resized after construction (§5). Because the outer `Vec` is fixed-length
//! for the supervisor's lifetime, reading its length or indexing into it
//! needs no lock of its own — only the per-peer record does.

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::peer::{PeerId, PeerRecord};

/// Fixed-size table of per-peer locks. Construct once at startup from
/// [`Config`] and share an `Arc<PeerTable>` across the three control loops.
pub struct PeerTable {
    peers: Vec<Mutex<PeerRecord>>,
}

impl PeerTable {
    /// Build the table from a validated config. One [`PeerRecord`] per
    /// configured peer, in configuration order (this order is `PeerId`).
    pub fn from_config(config: &Config) -> Self {
        let peers = config
            .peers
            .iter()
            .enumerate()
            .map(|(idx, peer_cfg)| {
                Mutex::new(PeerRecord::new(
                    PeerId(idx),
                    peer_cfg.message_path.clone(),
                    peer_cfg.launch_command.clone(),
                    peer_cfg.deadlines.clone(),
                    &peer_cfg.arming_roles,
                ))
            })
            .collect();
        Self { peers }
    }

    /// Number of supervised peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Lock a single peer's record. Callers must never hold two of these
    /// guards at once (§5) — cross-peer coordination goes through data
    /// copied out of one lock before a second is taken.
    pub fn lock(&self, id: PeerId) -> MutexGuard<'_, PeerRecord> {
        self.peers[id.0].lock()
    }

    /// Iterate peer ids in table order, without locking any of them.
    pub fn ids(&self) -> impl Iterator<Item = PeerId> {
        (0..self.peers.len()).map(PeerId)
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
