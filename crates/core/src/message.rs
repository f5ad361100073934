// SPDX-License-Identifier: MIT

//! Message log entities (spec.md §4.A).

use serde::{Deserialize, Serialize};

/// Message priority. Deliberately derives `Ord` from declaration order so
/// that `"normal" < "urgent"` lexicographically, matching the observed
/// `(priority ASC, created_at ASC)` inbox sort in spec.md §4.A/§8.3 — the
/// variant order below *is* the sort key, not an afterthought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

/// Who a message is addressed to: a single agent, or a fan-out broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    Direct(String),
    Broadcast,
}

pub const BROADCAST: &str = "broadcast";
pub const HUMAN: &str = "human";

impl Recipient {
    pub fn parse(to_agent: &str) -> Self {
        if to_agent == BROADCAST {
            Recipient::Broadcast
        } else {
            Recipient::Direct(to_agent.to_string())
        }
    }

    /// The raw `to_agent` wire value some callers still need.
    pub fn as_wire(&self) -> &str {
        match self {
            Recipient::Direct(id) => id,
            Recipient::Broadcast => BROADCAST,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self, Recipient::Broadcast)
    }
}

/// A typed message routed through the inbox dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from_agent: String,
    pub to_agent: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub car_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub acknowledged: bool,
    pub created_at: u64,
}

impl Message {
    pub fn recipient(&self) -> Recipient {
        Recipient::parse(&self.to_agent)
    }

    /// §3 Invariant 4: reply inherits the parent's thread id, or the
    /// parent's own id if it doesn't have one yet.
    pub fn thread_for_reply(&self) -> String {
        self.thread_id.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// A single `(message_id, agent_id)` acknowledgement row for a broadcast.
/// §3 Invariant 3: broadcast acks never mutate the `Message` row itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BroadcastAck {
    pub message_id: String,
    pub agent_id: String,
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
