// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative shutdown (§5): an `AtomicBool` observed at the top of each
//! control loop's suspension point. `SIGTERM`/`SIGINT` set the flag; the main
//! thread then joins all three workers as they unwind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared shutdown signal, cloned into each control loop.
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn inner(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Register `SIGTERM`/`SIGINT` handlers that set `flag`, via
/// `signal_hook::flag::register` — the crate's safe wrapper built exactly
/// for the "set an `AtomicBool` from a signal handler" case, so no raw
/// signal-handler code runs in this binary.
pub fn install_signal_handlers(flag: ShutdownFlag) -> Result<(), std::io::Error> {
    for sig in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT] {
        signal_hook::flag::register(sig, flag.inner())?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
