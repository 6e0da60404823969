// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The filesystem modification-event stream (§4.2, §6): one blocking read
//! multiplexed across every registered peer message path, returning the
//! identifier of whichever peer changed.

mod real;

pub use real::RealFsWatcher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeFsWatcher;

use std::path::Path;

use thiserror::Error;
use warden_core::PeerId;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to register watch on {path}: {source}")]
    RegistrationFailed {
        path: String,
        #[source]
        source: notify::Error,
    },

    #[error("event stream read failed: {0}")]
    EventReadFailed(String),

    #[error("event stream closed")]
    Closed,
}

/// One notification: the peer whose message file changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchEvent {
    pub peer: PeerId,
}

/// The multiplexed modification-event stream collaborator.
///
/// Corresponds to `WATCH_REGISTRATION_FAILED` (register, §7, fatal at
/// start-up) and `EVENT_READ_FAILED` (recv, §7, fatal — "the structure of
/// the loop is broken").
pub trait FsWatcher: Send + 'static {
    /// Subscribe to modification events on `path`, associating them with
    /// `peer`. Called once per peer during start-up (§4.1); never
    /// re-registered afterward (§4.4 notes the watch is stable).
    fn register(&mut self, peer: PeerId, path: &Path) -> Result<(), WatchError>;

    /// Block until the next modification event and return which peer it
    /// belongs to. Events for peers this watcher didn't register are never
    /// surfaced (the notify backend is asked to watch exactly the
    /// registered paths, nothing broader).
    fn recv(&self) -> Result<WatchEvent, WatchError>;
}
