// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::process::{Command, Stdio};

#[test]
fn kill_terminates_a_real_child() {
    let mut child = Command::new("sleep")
        .arg("30")
        .stdin(Stdio::null())
        .spawn()
        .unwrap();
    let pid = child.id();
    SignalKiller::new().kill(pid).unwrap();
    let status = child.wait().unwrap();
    assert!(!status.success());
}

#[test]
fn kill_of_a_nonexistent_pid_fails() {
    // PID 1 owned by init, reused test pids are unreliable; instead pick a
    // pid that is almost certainly unassigned.
    let err = SignalKiller::new().kill(u32::from(u16::MAX) * 4);
    assert!(err.is_err());
}
