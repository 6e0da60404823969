// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real-time thread scheduling (§5): each control loop runs on its own
//! `std::thread`, with its priority and scheduling policy set right after
//! spawn — mirroring the original's `pthread_setschedparam`, since real-time
//! priority is a property of an OS thread rather than a cooperatively
//! scheduled async task.

use std::thread::JoinHandle;

use thread_priority::{
    RealtimeThreadSchedulePolicy, ThreadBuilder, ThreadPriority, ThreadSchedulePolicy,
};

/// Relative priority of one of the three control loops (§5). Watchdog and
/// ingest share the highest priority; restart runs one step below so it
/// never delays a deadline evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPriority {
    Watchdog,
    Ingest,
    Restart,
}

impl LoopPriority {
    fn value(self) -> u8 {
        match self {
            LoopPriority::Watchdog | LoopPriority::Ingest => 99,
            LoopPriority::Restart => 50,
        }
    }
}

/// Spawn `f` on a dedicated thread named `name`, requesting `SCHED_FIFO`
/// (or the platform-equivalent real-time policy) at `priority`.
///
/// If the OS refuses the requested policy/priority (`PRIORITY_SET_FAILED`,
/// §7 — typically missing `CAP_SYS_NICE`), this logs a warning and the
/// thread proceeds at the platform's default scheduling instead of
/// aborting the supervisor: a watchdog that runs late is better than one
/// that does not run at all.
pub fn spawn_with_priority<F, T>(
    name: &str,
    priority: LoopPriority,
    f: F,
) -> std::io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let name = name.to_string();
    let requested = match priority.value().try_into() {
        Ok(value) => ThreadPriority::Crossplatform(value),
        Err(_) => ThreadPriority::Max,
    };

    ThreadBuilder::default()
        .name(name.clone())
        .priority(requested)
        .policy(ThreadSchedulePolicy::Realtime(
            RealtimeThreadSchedulePolicy::Fifo,
        ))
        .spawn(move |priority_result| {
            if let Err(error) = priority_result {
                tracing::warn!(
                    thread = %name,
                    ?error,
                    "failed to set real-time scheduling priority; continuing at default priority"
                );
            }
            f()
        })
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
