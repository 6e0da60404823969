// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static supervisor configuration (§4.1, §6, §10.1), loaded once at startup
//! from a TOML file and never mutated afterward.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::peer::ArmingRole;

fn default_tick_ms() -> u64 {
    1
}

fn default_inter_spawn_delay_ms() -> u64 {
    1000
}

fn default_restart_sweep_ms() -> u64 {
    2000
}

fn default_max_cp() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeerConfig {
    pub launch_command: String,
    pub message_path: PathBuf,
    #[serde(default)]
    pub deadlines: Vec<u64>,
    pub arming_roles: Vec<ArmingRole>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_inter_spawn_delay_ms")]
    pub inter_spawn_delay_ms: u64,
    #[serde(default = "default_restart_sweep_ms")]
    pub restart_sweep_ms: u64,
    /// Rotating log file path (§10.2). `None` logs to stdout only.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    #[serde(default = "default_max_cp")]
    pub max_cp: usize,
    pub peers: Vec<PeerConfig>,
}

impl Config {
    /// Read, parse, and validate the config at `path`. Fails fast with a
    /// descriptive [`ConfigError`] rather than panicking (§10.1).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.peers.is_empty() {
            return Err(ConfigError::Invalid("no peers configured".into()));
        }
        for (idx, peer) in self.peers.iter().enumerate() {
            if peer.arming_roles.len() != self.max_cp {
                return Err(ConfigError::Invalid(format!(
                    "peer {idx}: arming_roles has {} entries, expected max_cp = {}",
                    peer.arming_roles.len(),
                    self.max_cp
                )));
            }
            if peer.deadlines.len() > self.max_cp {
                return Err(ConfigError::Invalid(format!(
                    "peer {idx}: deadlines has {} entries, exceeds max_cp = {}",
                    peer.deadlines.len(),
                    self.max_cp
                )));
            }
            if peer.arming_roles.first() == Some(&ArmingRole::End) {
                return Err(ConfigError::Invalid(format!(
                    "peer {idx}: arming_roles[0] may not be \"end\" — there is no predecessor slot to disarm"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
