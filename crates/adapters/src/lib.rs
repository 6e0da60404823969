// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! OS collaborators for the supervisor: process launch, process termination,
//! the peer message-file channel, the filesystem watch stream, and real-time
//! thread priority. Nothing in `warden-core` touches any of these directly —
//! the three control loops in `warden-daemon` are generic over the traits
//! defined here.

pub mod killer;
pub mod launcher;
pub mod messagefile;
pub mod priority;
pub mod watch;

pub use killer::{KillerError, ProcessKiller, SignalKiller};
pub use launcher::{LauncherError, ProcessLauncher, ShellLauncher};
pub use messagefile::{MessageFile, MessageFileError};
pub use priority::{spawn_with_priority, LoopPriority};
pub use watch::{FsWatcher, RealFsWatcher, WatchError, WatchEvent};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use killer::FakeKiller;
#[cfg(any(test, feature = "test-support"))]
pub use launcher::FakeLauncher;
#[cfg(any(test, feature = "test-support"))]
pub use watch::FakeFsWatcher;
