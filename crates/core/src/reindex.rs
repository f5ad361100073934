// SPDX-License-Identifier: MIT

//! ReindexJob: work enqueued after a switch lands a real merge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReindexStatus {
    Pending,
    Running,
    Done,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexJob {
    pub track: String,
    pub trigger_commit: String,
    pub status: ReindexStatus,
    pub created_at: u64,
}

impl ReindexJob {
    pub fn new(track: impl Into<String>, trigger_commit: impl Into<String>, created_at: u64) -> Self {
        Self {
            track: track.into(),
            trigger_commit: trigger_commit.into(),
            status: ReindexStatus::Pending,
            created_at,
        }
    }
}

#[cfg(test)]
#[path = "reindex_tests.rs"]
mod tests;
