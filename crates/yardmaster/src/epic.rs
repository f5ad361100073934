// SPDX-License-Identifier: MIT

//! Recursive epic auto-close, shared by the switch engine's POST_MERGE phase,
//! the inbox dispatcher's `retry-merge`/`close-epic` handlers, and the
//! daemon's open-epic sweep.

use railyard_storage::Store;
use tracing::info;

use crate::YardmasterError;

/// Closes `epic_id` to `done` if every child has reached a resolved status,
/// broadcasts `epic-closed`, then recurses on the epic's own parent.
/// No-op if `epic_id` isn't an epic, has no children, or has an outstanding child.
pub fn try_close_epic(store: &Store, epic_id: &str) -> Result<bool, YardmasterError> {
    if !store.try_close_epic(epic_id)? {
        return Ok(false);
    }

    info!(epic_id, "epic closed");
    let opts = railyard_storage::SendOptions {
        car_id: epic_id.to_string(),
        ..Default::default()
    };
    store.send("yardmaster", railyard_core::BROADCAST, "epic-closed", epic_id, opts)?;

    if let Some(car) = store.get_car(epic_id) {
        if let Some(parent) = &car.parent {
            try_close_epic(store, parent)?;
        }
    }

    Ok(true)
}

#[cfg(test)]
#[path = "epic_tests.rs"]
mod tests;
