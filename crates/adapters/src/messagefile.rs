// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The peer message-file channel (§6): a per-peer file carrying either a
//! bare-decimal PID record (written once at peer startup) or a batch of
//! `cp: <decimal>` checkpoint records, consumed under a whole-file advisory
//! exclusive lock so that the {read, act, truncate} sequence in the ingest
//! and restart loops never races a peer's own writes.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

use fs2::FileExt;
use thiserror::Error;

/// Number of times to retry an exclusive lock before giving up (§7,
/// `LOCK_CONTENTION`). At the tick-period sleep this bounds the ingest loop
/// to roughly half a second of contention before it reports and moves on.
const LOCK_RETRIES: u32 = 50;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum MessageFileError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lock contention on {path}: gave up after {attempts} attempts")]
    LockContention { path: String, attempts: u32 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to truncate {path}: {source}")]
    Truncate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} contains no valid pid record")]
    NoPidRecord { path: String },
}

fn open_locked(path: &Path) -> Result<File, MessageFileError> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| MessageFileError::Open {
            path: path.display().to_string(),
            source,
        })?;

    for attempt in 0..LOCK_RETRIES {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(file),
            Err(_) if attempt + 1 < LOCK_RETRIES => {
                std::thread::sleep(LOCK_RETRY_DELAY);
            }
            Err(_) => {
                return Err(MessageFileError::LockContention {
                    path: path.display().to_string(),
                    attempts: LOCK_RETRIES,
                })
            }
        }
    }
    unreachable!("loop always returns")
}

fn read_all(file: &mut File, path: &Path) -> Result<String, MessageFileError> {
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|source| MessageFileError::Read {
            path: path.display().to_string(),
            source,
        })?;
    Ok(contents)
}

fn truncate(file: &mut File, path: &Path) -> Result<(), MessageFileError> {
    file.set_len(0).map_err(|source| MessageFileError::Truncate {
        path: path.display().to_string(),
        source,
    })?;
    file.seek(SeekFrom::Start(0))
        .map_err(|source| MessageFileError::Truncate {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}

/// Zero-sized handle grouping the message-file operations; there is no
/// per-call state to carry since each operation opens, locks, acts, and
/// releases the lock (via `File`'s drop) within one call.
pub struct MessageFile;

impl MessageFile {
    /// Read the PID a peer wrote at startup (or after a restart) and
    /// truncate the file. Used by §4.1 (initial spawn) and §4.4 (restart).
    pub fn read_pid(path: &Path) -> Result<u32, MessageFileError> {
        let mut file = open_locked(path)?;
        let contents = read_all(&mut file, path)?;
        let pid: u32 = contents
            .trim()
            .parse()
            .map_err(|_| MessageFileError::NoPidRecord {
                path: path.display().to_string(),
            })?;
        truncate(&mut file, path)?;
        FileExt::unlock(&file).ok();
        Ok(pid)
    }

    /// Read and remove all pending `cp: <k>` records, in file order,
    /// ignoring malformed lines and tokens outside `[0, max_cp)` (§4.2,
    /// both reported at debug level). Returns the parsed, range-checked slot
    /// indices; the caller applies each via
    /// `warden_core::transition::apply_checkpoint`.
    pub fn drain_cp_records(path: &Path, max_cp: usize) -> Result<Vec<usize>, MessageFileError> {
        let mut file = open_locked(path)?;
        let contents = read_all(&mut file, path)?;
        let records = contents
            .lines()
            .filter_map(|line| {
                let token = line.strip_prefix("cp:")?.trim();
                match token.parse::<usize>() {
                    Ok(k) if k < max_cp => Some(k),
                    Ok(k) => {
                        tracing::debug!(line, cp = k, max_cp, "ignoring out-of-range checkpoint record");
                        None
                    }
                    Err(_) => {
                        tracing::debug!(line, "ignoring malformed checkpoint record");
                        None
                    }
                }
            })
            .collect();
        truncate(&mut file, path)?;
        FileExt::unlock(&file).ok();
        Ok(records)
    }
}

#[cfg(test)]
#[path = "messagefile_tests.rs"]
mod tests;
