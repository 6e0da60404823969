// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn records_calls() {
    let launcher = FakeLauncher::new();
    launcher.launch("echo one").unwrap();
    launcher.launch("echo two").unwrap();
    assert_eq!(launcher.calls(), vec!["echo one", "echo two"]);
}

#[test]
fn fail_next_call_fails_exactly_one_call() {
    let launcher = FakeLauncher::new();
    launcher.fail_next_call();
    assert!(launcher.launch("echo one").is_err());
    assert!(launcher.launch("echo two").is_ok());
}
