// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write as _;

fn file_with(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("msg");
    let mut f = File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    (dir, path)
}

#[test]
fn read_pid_parses_and_truncates() {
    let (_dir, path) = file_with("4242\n");
    let pid = MessageFile::read_pid(&path).unwrap();
    assert_eq!(pid, 4242);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn read_pid_rejects_non_numeric_contents() {
    let (_dir, path) = file_with("not-a-pid\n");
    assert!(matches!(
        MessageFile::read_pid(&path),
        Err(MessageFileError::NoPidRecord { .. })
    ));
}

#[test]
fn drain_cp_records_parses_all_in_order() {
    let (_dir, path) = file_with("cp: 0\ncp: 1\ncp: 2\n");
    let records = MessageFile::drain_cp_records(&path, 4).unwrap();
    assert_eq!(records, vec![0, 1, 2]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn drain_cp_records_skips_malformed_lines() {
    let (_dir, path) = file_with("xyz\ncp: 1\n\ncp: oops\n");
    let records = MessageFile::drain_cp_records(&path, 4).unwrap();
    assert_eq!(records, vec![1]);
}

#[test]
fn drain_cp_records_skips_tokens_at_or_beyond_max_cp() {
    let (_dir, path) = file_with("cp: 1\ncp: 4\ncp: 50\n");
    let records = MessageFile::drain_cp_records(&path, 4).unwrap();
    assert_eq!(records, vec![1]);
}

#[test]
fn drain_cp_records_on_empty_file_is_empty() {
    let (_dir, path) = file_with("");
    assert!(MessageFile::drain_cp_records(&path, 4).unwrap().is_empty());
}

#[test]
fn open_of_missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist");
    assert!(matches!(
        MessageFile::drain_cp_records(&path, 4),
        Err(MessageFileError::Open { .. })
    ));
}

#[test]
fn burst_of_records_between_two_reads_all_apply_in_one_pass() {
    let (_dir, path) = file_with(
        "cp: 0\ncp: 1\ncp: 1\ncp: 2\ncp: 1\ncp: 2\ncp: 3\ncp: 2\ncp: 3\ncp: 3\n",
    );
    let records = MessageFile::drain_cp_records(&path, 4).unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records.last(), Some(&3));
}
