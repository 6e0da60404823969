// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake filesystem watcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use parking_lot::Mutex;
use warden_core::PeerId;

use super::{FsWatcher, WatchError, WatchEvent};

/// Drives a [`FakeFsWatcher`]'s `recv()` without any real filesystem event.
/// Clone freely; every clone shares the same underlying queue.
#[derive(Clone)]
pub struct FakeFsWatcherHandle {
    tx: Sender<WatchEvent>,
}

impl FakeFsWatcherHandle {
    /// Enqueue a synthetic modification event for `peer`.
    pub fn push(&self, peer: PeerId) {
        let _ = self.tx.send(WatchEvent { peer });
    }
}

/// Fake watcher: `register` just records the path, `recv` blocks on an
/// in-process queue fed by [`FakeFsWatcherHandle::push`] instead of a real
/// `notify` backend.
pub struct FakeFsWatcher {
    rx: Receiver<WatchEvent>,
    handle: FakeFsWatcherHandle,
    registered: Arc<Mutex<HashMap<PeerId, PathBuf>>>,
}

impl FakeFsWatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            handle: FakeFsWatcherHandle { tx },
            registered: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn handle(&self) -> FakeFsWatcherHandle {
        self.handle.clone()
    }

    pub fn registered_paths(&self) -> HashMap<PeerId, PathBuf> {
        self.registered.lock().clone()
    }
}

impl Default for FakeFsWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FsWatcher for FakeFsWatcher {
    fn register(&mut self, peer: PeerId, path: &Path) -> Result<(), WatchError> {
        self.registered.lock().insert(peer, path.to_path_buf());
        Ok(())
    }

    fn recv(&self) -> Result<WatchEvent, WatchError> {
        self.rx.recv().map_err(|_| WatchError::Closed)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
