// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Checkpoint-ingest loop (§4.2): blocks on the filesystem modification-event
//! stream, drains each notified peer's message file, applies every CP record
//! via `warden_core::transition::apply_checkpoint`, and then runs one restart
//! pass (§4.4) so a peer terminated since the last wake-up is revived without
//! waiting on a dedicated timer.

use std::sync::Arc;
use std::thread;

use warden_adapters::{FsWatcher, MessageFile, ProcessLauncher};
use warden_core::{transition, Config, PeerTable};

use crate::restart;
use crate::shutdown::ShutdownFlag;

/// Run the ingest loop until `shutdown` is set or the event stream closes.
///
/// A single `recv()` returns exactly one peer's notification (§6: "a single
/// blocking read that returns a batch of notifications" is realized here as
/// one event per wake-up, with the watcher itself doing any coalescing); each
/// wake-up drains every pending CP record for that peer before moving on, so
/// a burst of appends between two notifications is still applied in file
/// order in one pass (§8, S6).
pub fn run<W: FsWatcher, L: ProcessLauncher>(
    config: &Config,
    table: &PeerTable,
    watcher: &W,
    launcher: &L,
    shutdown: &ShutdownFlag,
) {
    while !shutdown.is_set() {
        let event = match watcher.recv() {
            Ok(event) => event,
            Err(error) => {
                if shutdown.is_set() {
                    return;
                }
                tracing::error!(%error, "event stream read failed, ingest loop exiting");
                return;
            }
        };

        let peer_cfg = &config.peers[event.peer.0];
        match MessageFile::drain_cp_records(&peer_cfg.message_path, config.max_cp) {
            Ok(records) => {
                if !records.is_empty() {
                    let mut peer = table.lock(event.peer);
                    for k in records {
                        tracing::debug!(peer = %event.peer, cp = k, "applying checkpoint record");
                        transition::apply_checkpoint(&mut peer, k);
                    }
                }
            }
            Err(error) => {
                tracing::warn!(peer = %event.peer, %error, "failed to drain checkpoint file, skipping event");
            }
        }

        restart::run_pass(config, table, launcher);
    }
}

/// Run the ingest loop on its own OS thread at real-time priority (§5).
pub fn spawn<W: FsWatcher, L: ProcessLauncher + Send + 'static>(
    config: Arc<Config>,
    table: Arc<PeerTable>,
    watcher: W,
    launcher: L,
    shutdown: ShutdownFlag,
) -> std::io::Result<thread::JoinHandle<()>> {
    warden_adapters::spawn_with_priority(
        "warden-ingest",
        warden_adapters::LoopPriority::Ingest,
        move || run(&config, &table, &watcher, &launcher, &shutdown),
    )
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
