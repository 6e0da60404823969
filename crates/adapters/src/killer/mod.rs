// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Peer process termination.

mod signal;

pub use signal::SignalKiller;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeKiller;

use thiserror::Error;

/// Errors from terminating a peer process. Corresponds to `KILL_FAILED` (§7).
#[derive(Debug, Error)]
pub enum KillerError {
    #[error("failed to terminate pid {pid}: {source}")]
    SignalFailed {
        pid: u32,
        #[source]
        source: nix::Error,
    },
}

/// Abstract "terminate PID" collaborator (§6, §9). A failed kill leaves the
/// peer in *starting*; the watchdog retries on its next tick (§4.5, §7).
pub trait ProcessKiller: Send + Sync + 'static {
    fn kill(&self, pid: u32) -> Result<(), KillerError>;
}
