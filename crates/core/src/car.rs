// SPDX-License-Identifier: MIT

//! Car: a unit of work tracked by Railyard.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of car. Left open-ended beyond the well-known variants the
/// Yardmaster treats specially (`Epic`), mirroring how the surrounding
/// system treats "type" as a mostly-opaque string outside of epic handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarType {
    Task,
    Bug,
    Epic,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for CarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CarType::Task => write!(f, "task"),
            CarType::Bug => write!(f, "bug"),
            CarType::Epic => write!(f, "epic"),
            CarType::Other => write!(f, "other"),
        }
    }
}

/// Lifecycle status of a car (§3 Invariant 2: terminal on `Merged`/`Cancelled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    Open,
    Ready,
    Claimed,
    InProgress,
    Blocked,
    Done,
    Merged,
    PrOpen,
    Cancelled,
    MergeFailed,
}

impl CarStatus {
    /// Terminal statuses never transition back out (§3 Invariant 2).
    pub fn is_terminal(&self) -> bool {
        matches!(self, CarStatus::Merged | CarStatus::Cancelled)
    }

    /// Statuses that count as "resolved" for dependency-blocking purposes.
    pub fn unblocks_dependents(&self) -> bool {
        matches!(
            self,
            CarStatus::Done | CarStatus::Merged | CarStatus::Cancelled
        )
    }
}

impl std::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CarStatus::Open => "open",
            CarStatus::Ready => "ready",
            CarStatus::Claimed => "claimed",
            CarStatus::InProgress => "in_progress",
            CarStatus::Blocked => "blocked",
            CarStatus::Done => "done",
            CarStatus::Merged => "merged",
            CarStatus::PrOpen => "pr_open",
            CarStatus::Cancelled => "cancelled",
            CarStatus::MergeFailed => "merge-failed",
        };
        write!(f, "{s}")
    }
}

/// A unit of work tracked by the system (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: CarType,
    pub status: CarStatus,
    pub track: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub skip_tests: bool,
    #[serde(default)]
    pub acceptance: String,
    #[serde(default)]
    pub design_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

fn default_base_branch() -> String {
    "main".to_string()
}

impl Car {
    /// §3 Invariant 1: `assignee` is non-empty only while claimed/in-progress/blocked.
    pub fn assignee_invariant_holds(&self) -> bool {
        if self.assignee.is_empty() {
            true
        } else {
            matches!(
                self.status,
                CarStatus::Claimed | CarStatus::InProgress | CarStatus::Blocked
            )
        }
    }

    pub fn is_epic(&self) -> bool {
        self.kind == CarType::Epic
    }
}

#[cfg(test)]
#[path = "car_tests.rs"]
mod tests;
