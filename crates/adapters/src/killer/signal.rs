// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SIGTERM`-based process killer.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use super::{KillerError, ProcessKiller};

/// Terminates a peer by sending it `SIGTERM`.
///
/// `SIGTERM` rather than `SIGKILL` so a peer that traps the signal gets a
/// chance to flush state before exiting; the watchdog does not wait for
/// exit confirmation, it only checks that the signal was delivered (§4.5).
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalKiller;

impl SignalKiller {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessKiller for SignalKiller {
    fn kill(&self, pid: u32) -> Result<(), KillerError> {
        kill(Pid::from_raw(pid as i32), Signal::SIGTERM)
            .map_err(|source| KillerError::SignalFailed { pid, source })
    }
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
