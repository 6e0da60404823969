// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process killer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;

use parking_lot::Mutex;

use super::{KillerError, ProcessKiller};

struct FakeKillerState {
    killed: Vec<u32>,
    fail_pids: Vec<u32>,
}

/// Records kill calls instead of signaling anything. [`FakeKiller::fail_pid`]
/// makes the next kill of a specific pid return `KILL_FAILED`, exercising
/// §4.5's retry-next-tick path.
#[derive(Clone)]
pub struct FakeKiller {
    inner: Arc<Mutex<FakeKillerState>>,
}

impl Default for FakeKiller {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeKillerState {
                killed: Vec::new(),
                fail_pids: Vec::new(),
            })),
        }
    }
}

impl FakeKiller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn killed(&self) -> Vec<u32> {
        self.inner.lock().killed.clone()
    }

    pub fn fail_pid(&self, pid: u32) {
        self.inner.lock().fail_pids.push(pid);
    }
}

impl ProcessKiller for FakeKiller {
    fn kill(&self, pid: u32) -> Result<(), KillerError> {
        let mut state = self.inner.lock();
        if let Some(idx) = state.fail_pids.iter().position(|&p| p == pid) {
            state.fail_pids.remove(idx);
            return Err(KillerError::SignalFailed {
                pid,
                source: nix::Error::ESRCH,
            });
        }
        state.killed.push(pid);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
