// SPDX-License-Identifier: MIT

//! Engine: a worker process claiming and executing cars.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    Idle,
    Working,
    Stalled,
    Dead,
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Working => "working",
            EngineStatus::Stalled => "stalled",
            EngineStatus::Dead => "dead",
        };
        write!(f, "{s}")
    }
}

/// The well-known id the Yardmaster's own engine row uses, and its track wildcard.
pub const YARDMASTER_ID: &str = "yardmaster";
pub const SUPERVISOR_TRACK: &str = "*";

/// An engine (external worker process) record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub id: String,
    pub track: String,
    pub role: String,
    pub status: EngineStatus,
    #[serde(default)]
    pub current_car: String,
    pub started_at: u64,
    pub last_activity: u64,
}

impl Engine {
    pub fn new_yardmaster(now_ms: u64) -> Self {
        Self {
            id: YARDMASTER_ID.to_string(),
            track: SUPERVISOR_TRACK.to_string(),
            role: "yardmaster".to_string(),
            status: EngineStatus::Idle,
            current_car: String::new(),
            started_at: now_ms,
            last_activity: now_ms,
        }
    }

    pub fn is_yardmaster(&self) -> bool {
        self.id == YARDMASTER_ID
    }

    /// §4.B stale-engine predicate: last activity older than threshold and not already dead.
    pub fn is_stale(&self, now_ms: u64, threshold_ms: u64) -> bool {
        self.status != EngineStatus::Dead && now_ms.saturating_sub(self.last_activity) >= threshold_ms
    }

    pub fn is_idle(&self) -> bool {
        self.status == EngineStatus::Idle && self.current_car.is_empty()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
