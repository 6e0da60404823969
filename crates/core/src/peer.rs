// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peer records and checkpoint (CP) slot state.
//!
//! See `transition.rs` for the rules that mutate a [`PeerRecord`]'s `cp_slots`.

use std::fmt;
use std::path::PathBuf;

/// Index of a supervised peer in `[0, N)`. Stable for the supervisor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub usize);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer[{}]", self.0)
    }
}

/// Lifecycle state of a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Never spawned yet.
    Initial,
    /// Spawned and believed to be running (`pid != 0`).
    Starting,
    /// Forcibly killed by the watchdog; awaiting the restart loop.
    Terminated,
}

/// Static classification of a CP slot, fixed at configuration time.
///
/// Controls how the arrival of that checkpoint reshapes the peer's active
/// countdown (see `transition::apply_checkpoint`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmingRole {
    /// Neither a sequence start nor a sequence end: arms this slot, disarms
    /// the previous one.
    None,
    /// First checkpoint in a run: arms this slot, nothing to disarm.
    Start,
    /// Last checkpoint in a run: disarms the previous slot, arms nothing.
    End,
}

/// Per-peer, per-checkpoint-index state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpSlot {
    pub arming_role: ArmingRole,
    pub active: bool,
    pub remaining: u64,
}

impl CpSlot {
    pub fn new(arming_role: ArmingRole) -> Self {
        Self {
            arming_role,
            active: false,
            remaining: 0,
        }
    }

    /// Clears the countdown. Used on kill (§4.5) and on peer creation.
    pub fn disarm(&mut self) {
        self.active = false;
        self.remaining = 0;
    }
}

/// One supervised process.
#[derive(Debug, Clone)]
pub struct PeerRecord {
    pub id: PeerId,
    pub pid: u32,
    pub state: PeerState,
    pub message_path: PathBuf,
    pub launch_command: String,
    pub last_cp_token: Option<String>,
    pub deadlines: Vec<u64>,
    pub cp_slots: Vec<CpSlot>,
}

impl PeerRecord {
    /// Build a peer record in its initial state: no pid, state = Initial,
    /// every cp_slot disarmed. `arming_roles.len()` must equal `MAX_CP`;
    /// `deadlines.len()` must be `<= MAX_CP` (the config loader enforces this).
    pub fn new(
        id: PeerId,
        message_path: PathBuf,
        launch_command: String,
        deadlines: Vec<u64>,
        arming_roles: &[ArmingRole],
    ) -> Self {
        let cp_slots = arming_roles.iter().copied().map(CpSlot::new).collect();
        Self {
            id,
            pid: 0,
            state: PeerState::Initial,
            message_path,
            launch_command,
            last_cp_token: None,
            deadlines,
            cp_slots,
        }
    }

    /// The unique active slot, if any (invariant 1: at most one).
    pub fn active_slot(&self) -> Option<usize> {
        self.cp_slots.iter().position(|s| s.active)
    }

    /// Deadline budget configured for slot `k`, or 0 if `k` is out of range
    /// for `deadlines` (a peer may configure fewer deadlines than MAX_CP).
    pub fn deadline_for(&self, k: usize) -> u64 {
        self.deadlines.get(k).copied().unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "peer_tests.rs"]
mod tests;
