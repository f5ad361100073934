// SPDX-License-Identifier: MIT

//! Daemon configuration (§4.I ambient concern): a minimal TOML file naming
//! the state directory, the repo to operate on, and per-track test commands.
//! Layered env overrides, hot reload, and schema validation are out of scope.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::DaemonError;

/// Per-track settings the switch engine and rebalancer need.
#[derive(Debug, Clone)]
pub struct TrackSettings {
    pub max_slots: u32,
    pub pre_test_command: Option<String>,
    pub test_command: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub repo_dir: PathBuf,
    pub base_branch: String,
    pub poll_interval: Duration,
    pub stale_threshold: Duration,
    pub max_switch_failures: u32,
    pub require_pr: bool,
    pub tracks: HashMap<String, TrackSettings>,
}

impl Config {
    /// Load from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, DaemonError> {
        let raw = std::fs::read_to_string(path)?;
        let file: RawConfig = toml::from_str(&raw).map_err(|e| DaemonError::Config(e.to_string()))?;
        file.into_config()
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join("daemon.lock")
    }

    pub fn store_dir(&self) -> PathBuf {
        self.state_dir.join("store")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("daemon.log")
    }

    /// Resolve `track`'s settings, falling back to the built-in default test
    /// command when the track is unconfigured (spec.md §9 open question: the
    /// switch engine itself carries no default — only the daemon loop does).
    pub fn track_settings(&self, track: &str) -> TrackSettings {
        self.tracks.get(track).cloned().unwrap_or_else(|| TrackSettings {
            max_slots: 1,
            pre_test_command: None,
            test_command: railyard_yardmaster::defaults::DEFAULT_TEST_COMMAND.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    state_dir: String,
    repo_dir: String,
    #[serde(default = "default_base_branch")]
    base_branch: String,
    #[serde(default)]
    poll_interval_secs: Option<u64>,
    #[serde(default)]
    stale_threshold_secs: Option<u64>,
    #[serde(default)]
    max_switch_failures: Option<u32>,
    #[serde(default)]
    require_pr: bool,
    #[serde(default)]
    track: HashMap<String, RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default = "default_max_slots")]
    max_slots: u32,
    #[serde(default)]
    pre_test_command: Option<String>,
    #[serde(default)]
    test_command: Option<String>,
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_max_slots() -> u32 {
    1
}

impl RawConfig {
    fn into_config(self) -> Result<Config, DaemonError> {
        if self.state_dir.is_empty() {
            return Err(DaemonError::Config("state_dir must not be empty".to_string()));
        }
        if self.repo_dir.is_empty() {
            return Err(DaemonError::Config("repo_dir must not be empty".to_string()));
        }

        let tracks = self
            .track
            .into_iter()
            .map(|(name, raw)| {
                let settings = TrackSettings {
                    max_slots: raw.max_slots,
                    pre_test_command: raw.pre_test_command,
                    test_command: raw
                        .test_command
                        .unwrap_or_else(|| railyard_yardmaster::defaults::DEFAULT_TEST_COMMAND.to_string()),
                };
                (name, settings)
            })
            .collect();

        Ok(Config {
            state_dir: PathBuf::from(self.state_dir),
            repo_dir: PathBuf::from(self.repo_dir),
            base_branch: self.base_branch,
            poll_interval: Duration::from_secs(
                self.poll_interval_secs
                    .unwrap_or_else(|| railyard_yardmaster::defaults::POLL_INTERVAL.as_secs()),
            ),
            stale_threshold: Duration::from_secs(
                self.stale_threshold_secs
                    .unwrap_or(railyard_yardmaster::defaults::STALE_THRESHOLD_SECS),
            ),
            max_switch_failures: self
                .max_switch_failures
                .unwrap_or(railyard_yardmaster::defaults::MAX_SWITCH_FAILURES),
            require_pr: self.require_pr,
            tracks,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
