// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardend`: the supervisor binary (§10.3). Takes a single optional
//! positional config-file argument (default `./warden.toml`), handles
//! `--help`/`--version` before touching any config or OS resource, installs
//! a `tracing-subscriber` `EnvFilter` subscriber (to a rotating log file when
//! `log_path` is configured, to stdout otherwise), then hands off to
//! `warden_daemon::run_supervisor` for the rest of the process's life.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "./warden.toml";

/// Log file size (bytes) above which [`rotate_log_if_needed`] shifts the
/// previous run's log out of the way before this run starts writing.
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ROTATED_LOGS: u32 = 3;

fn print_help() {
    println!("wardend {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    wardend [CONFIG_PATH]");
    println!();
    println!("ARGS:");
    println!("    <CONFIG_PATH>    Path to the supervisor's TOML config [default: {DEFAULT_CONFIG_PATH}]");
    println!();
    println!("FLAGS:");
    println!("    -h, --help       Print this message and exit");
    println!("    -V, --version    Print version and exit");
}

/// Shift `log_path` to `log_path.1`, any existing `.1`..`.{MAX_ROTATED_LOGS-1}`
/// up by one, dropping the oldest, if the current log has grown past
/// `MAX_LOG_SIZE`. Best-effort: a failed rename just means this run appends
/// to an oversized file rather than losing log output outright.
fn rotate_log_if_needed(log_path: &Path) {
    let size = match std::fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(_) => return,
    };
    if size < MAX_LOG_SIZE {
        return;
    }

    let log_str = log_path.display().to_string();
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = format!("{log_str}.{i}");
        let to = format!("{log_str}.{}", i + 1);
        let _ = std::fs::rename(from, to);
    }
    let _ = std::fs::rename(log_path, format!("{log_str}.1"));
}

/// Install the global `tracing` subscriber. Returns the `WorkerGuard` that
/// must stay alive for the process's whole lifetime when logging to a file
/// (the non-blocking writer flushes on drop) — `None` when logging to
/// stdout, which has no such guard.
fn init_logging(log_path: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_path) = log_path else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        return None;
    };

    let Some(parent) = log_path.parent() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        return None;
    };
    if std::fs::create_dir_all(parent).is_err() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        return None;
    }

    rotate_log_if_needed(log_path);

    let Some(file_name) = log_path.file_name() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(non_blocking))
        .init();

    Some(guard)
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;

    for arg in args.by_ref() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "-V" | "--version" => {
                println!("wardend {}", env!("CARGO_PKG_VERSION"));
                return ExitCode::SUCCESS;
            }
            other => {
                config_path = Some(PathBuf::from(other));
            }
        }
    }

    let config_path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match warden_core::Config::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            // Logging isn't installed yet (it depends on the config we just
            // failed to load), so this goes straight to stderr.
            eprintln!("failed to load config {}: {error}", config_path.display());
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(config.log_path.as_ref());

    match warden_daemon::run_supervisor(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "supervisor exited with a fatal error");
            ExitCode::FAILURE
        }
    }
}
