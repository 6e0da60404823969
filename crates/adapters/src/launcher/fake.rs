// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process launcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;

use parking_lot::Mutex;

use super::{LauncherError, ProcessLauncher};

struct FakeLauncherState {
    calls: Vec<String>,
    fail_next: bool,
}

/// Records launch calls instead of spawning anything. Tests assert against
/// [`FakeLauncher::calls`] and can force the next call to fail via
/// [`FakeLauncher::fail_next_call`].
#[derive(Clone)]
pub struct FakeLauncher {
    inner: Arc<Mutex<FakeLauncherState>>,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLauncherState {
                calls: Vec::new(),
                fail_next: false,
            })),
        }
    }
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    pub fn fail_next_call(&self) {
        self.inner.lock().fail_next = true;
    }
}

impl ProcessLauncher for FakeLauncher {
    fn launch(&self, command: &str) -> Result<(), LauncherError> {
        let mut state = self.inner.lock();
        state.calls.push(command.to_string());
        if state.fail_next {
            state.fail_next = false;
            return Err(LauncherError::SpawnFailed {
                command: command.to_string(),
                source: std::io::Error::other("fake spawn failure"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
