// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `notify`-backed filesystem watcher.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use warden_core::PeerId;

use super::{FsWatcher, WatchError, WatchEvent};

fn canonical_or_self(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Multiplexes `notify::recommended_watcher` events for every registered
/// peer message path onto one blocking channel read.
pub struct RealFsWatcher {
    watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<notify::Event>>,
    paths: Arc<Mutex<HashMap<PathBuf, PeerId>>>,
}

impl RealFsWatcher {
    pub fn new() -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(|source| WatchError::RegistrationFailed {
            path: "<watcher init>".into(),
            source,
        })?;
        Ok(Self {
            watcher,
            rx,
            paths: Arc::new(Mutex::new(HashMap::new())),
        })
    }
}

impl FsWatcher for RealFsWatcher {
    fn register(&mut self, peer: PeerId, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::RegistrationFailed {
                path: path.display().to_string(),
                source,
            })?;
        self.paths.lock().insert(canonical_or_self(path), peer);
        Ok(())
    }

    fn recv(&self) -> Result<WatchEvent, WatchError> {
        loop {
            let event = self
                .rx
                .recv()
                .map_err(|_| WatchError::Closed)?
                .map_err(|e| WatchError::EventReadFailed(e.to_string()))?;

            let paths = self.paths.lock();
            if let Some(peer) = event
                .paths
                .iter()
                .find_map(|p| paths.get(&canonical_or_self(p)).copied())
            {
                return Ok(WatchEvent { peer });
            }
            // Event for a path we don't track (e.g. a metadata-only event
            // notify coalesced in); keep waiting for the next one.
        }
    }
}

#[cfg(test)]
#[path = "real_tests.rs"]
mod tests;
