// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watchdog loop (§4.5): a periodic 1 ms tick that decrements every peer's
//! active deadline and kills any peer whose countdown reaches zero.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use warden_adapters::ProcessKiller;
use warden_core::transition::{self, TickOutcome};
use warden_core::PeerTable;

use crate::shutdown::ShutdownFlag;

/// Run the watchdog loop until `shutdown` is set.
///
/// Each iteration measures elapsed wall-clock time since the previous one
/// and converts it into a whole number of tick expirations (§5's
/// missed-tick policy), so a host scheduling hiccup cannot make a deadline
/// fire later than its real-time budget.
pub fn run<K: ProcessKiller>(table: &PeerTable, killer: &K, tick: Duration, shutdown: &ShutdownFlag) {
    let mut last = Instant::now();

    while !shutdown.is_set() {
        thread::sleep(tick);
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;
        let expirations = (elapsed.as_nanos() / tick.as_nanos().max(1)).max(1) as u64;

        for id in table.ids() {
            let mut peer = table.lock(id);
            match transition::tick_peer(&peer, expirations) {
                TickOutcome::Idle => {}
                TickOutcome::Counting => transition::commit_tick(&mut peer, expirations),
                TickOutcome::DeadlineBreached { slot } => {
                    let pid = peer.pid;
                    match killer.kill(pid) {
                        Ok(()) => {
                            tracing::info!(peer = %id, pid, slot, "deadline breached, peer killed");
                            transition::mark_terminated(&mut peer);
                        }
                        Err(error) => {
                            tracing::warn!(peer = %id, pid, %error, "kill failed, will retry next tick");
                        }
                    }
                }
            }
        }
    }
}

/// Run the watchdog loop on its own OS thread at real-time priority (§5).
pub fn spawn<K: ProcessKiller + Send + 'static>(
    table: Arc<PeerTable>,
    killer: K,
    tick: Duration,
    shutdown: ShutdownFlag,
) -> std::io::Result<thread::JoinHandle<()>> {
    warden_adapters::spawn_with_priority(
        "warden-watchdog",
        warden_adapters::LoopPriority::Watchdog,
        move || run(&table, &killer, tick, &shutdown),
    )
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
