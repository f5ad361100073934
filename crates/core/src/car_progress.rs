// SPDX-License-Identifier: MIT

//! CarProgress: the append-only audit log + structured failure counter.

use serde::{Deserialize, Serialize};

/// Prefix every switch-failure progress note carries (§3 Invariant 6).
pub const SWITCH_NOTE_PREFIX: &str = "switch:";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarProgress {
    pub car_id: String,
    pub engine_id: String,
    pub note: String,
    #[serde(default)]
    pub files_changed: Vec<String>,
    pub created_at: u64,
}

impl CarProgress {
    /// Builds a `switch:<category>:<detail>` note per §3 Invariant 6 / §4.E.
    pub fn switch_note(category: &str, detail: &str) -> String {
        format!("{SWITCH_NOTE_PREFIX}{category}:{detail}")
    }

    /// The failure category embedded in a `switch:<category>:...` note, if any.
    pub fn switch_category(&self) -> Option<&str> {
        let rest = self.note.strip_prefix(SWITCH_NOTE_PREFIX)?;
        rest.split(':').next()
    }

    pub fn is_switch_note(&self) -> bool {
        self.note.starts_with(SWITCH_NOTE_PREFIX)
    }
}

#[cfg(test)]
#[path = "car_progress_tests.rs"]
mod tests;
