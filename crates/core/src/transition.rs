// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure state-transition rules for CP ingestion (§4.3) and deadline decrement
//! (§4.5). These take a `&mut PeerRecord` and never touch the filesystem, a
//! process, or a clock, so they are exercised directly in unit tests without
//! any fake adapters.

use crate::peer::{ArmingRole, PeerRecord, PeerState};

/// Apply one ingested `cp: <k>` record to `peer`, per §4.3.
///
/// `k` is expected to already be in range: `warden_adapters::MessageFile::
/// drain_cp_records` range-checks against `max_cp` while parsing and drops
/// (at debug level) any token outside `[0, max_cp)` before it ever reaches
/// here. `cp_slots.get(k)` is still checked rather than indexed directly, so
/// an out-of-range `k` from some other caller is a no-op instead of a panic.
pub fn apply_checkpoint(peer: &mut PeerRecord, k: usize) {
    let Some(role) = peer.cp_slots.get(k).map(|s| s.arming_role) else {
        return;
    };

    peer.last_cp_token = Some(k.to_string());

    match role {
        ArmingRole::End => {
            // Tie-break: k=0 with an end role has no predecessor to disarm.
            // (Spec calls this out only for `none`, but it applies equally
            // here — there is nothing at index -1 either way.)
            if k > 0 {
                peer.cp_slots[k - 1].active = false;
            }
        }
        ArmingRole::Start => {
            let deadline = peer.deadline_for(k);
            let slot = &mut peer.cp_slots[k];
            slot.remaining = deadline;
            slot.active = true;
        }
        ArmingRole::None => {
            let deadline = peer.deadline_for(k);
            {
                let slot = &mut peer.cp_slots[k];
                slot.remaining = deadline;
                slot.active = true;
            }
            // Tie-break: k=0 with `none` suppresses the disarm of slot k-1
            // (there is no slot -1).
            if k > 0 {
                peer.cp_slots[k - 1].active = false;
            }
        }
    }
}

/// Outcome of one watchdog tick against a single peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing armed, or the peer isn't `Starting`: no change.
    Idle,
    /// An active slot's countdown continued; still > 0 remaining.
    Counting,
    /// An active slot reached 0 remaining: the caller must kill `peer.pid`.
    DeadlineBreached { slot: usize },
}

/// Decrement `peer`'s active slot (if any) by `expirations` ticks, per §4.5's
/// missed-tick policy: a batch of N timer expirations read in one pass counts
/// as N decrements, so a deadline never overshoots real time even under
/// scheduler jitter.
///
/// Does not perform the kill itself — that requires the process-kill
/// collaborator and peer-state transition, which live in the daemon's
/// watchdog loop so this function stays pure and synchronous-free.
pub fn tick_peer(peer: &PeerRecord, expirations: u64) -> TickOutcome {
    if peer.state != PeerState::Starting {
        return TickOutcome::Idle;
    }
    let Some(slot_idx) = peer.active_slot() else {
        return TickOutcome::Idle;
    };
    let remaining = peer.cp_slots[slot_idx].remaining;
    let decremented = remaining.saturating_sub(expirations);
    if decremented == 0 {
        TickOutcome::DeadlineBreached { slot: slot_idx }
    } else {
        TickOutcome::Counting
    }
}

/// Apply the decrement computed by [`tick_peer`] back into `peer`. Split from
/// `tick_peer` so the watchdog loop can compute the outcome, decide whether a
/// kill succeeded, and only then commit the new `remaining` — see
/// `warden-daemon::watchdog`.
pub fn commit_tick(peer: &mut PeerRecord, expirations: u64) {
    if let Some(slot_idx) = peer.active_slot() {
        let slot = &mut peer.cp_slots[slot_idx];
        slot.remaining = slot.remaining.saturating_sub(expirations);
    }
}

/// Clear all cp_slots and the pid, and mark the peer terminated. Applied
/// after a successful kill (§4.5) — invariant 2 in §8.
pub fn mark_terminated(peer: &mut PeerRecord) {
    for slot in &mut peer.cp_slots {
        slot.disarm();
    }
    peer.pid = 0;
    peer.state = PeerState::Terminated;
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
