// SPDX-License-Identifier: MIT

//! Event log vocabulary for the materialized store.
//!
//! Every mutation the yardmaster makes goes through one of these events so
//! that [`crate::MaterializedState::apply_event`] can rebuild state from the
//! WAL on restart. Handlers must be idempotent: applying the same event
//! twice must leave state identical to applying it once.

use railyard_core::{Car, CarDep, CarProgress, Engine, EngineStatus, Message, ReindexJob, ReindexStatus, CarStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    CarCreated {
        car: Car,
    },
    CarStatusSet {
        car_id: String,
        status: CarStatus,
        completed_at: Option<u64>,
    },
    CarAssigneeSet {
        car_id: String,
        assignee: String,
    },
    CarBranchSet {
        car_id: String,
        branch: String,
        base_branch: String,
    },
    CarVarsUpdated {
        car_id: String,
        vars: HashMap<String, String>,
    },
    CarDepAdded {
        dep: CarDep,
    },
    ProgressAdded {
        progress: CarProgress,
    },
    EngineUpserted {
        engine: Engine,
    },
    EngineStatusSet {
        engine_id: String,
        status: EngineStatus,
        current_car: Option<String>,
    },
    EngineHeartbeat {
        engine_id: String,
        last_activity: u64,
    },
    EngineRemoved {
        engine_id: String,
    },
    MessageSent {
        message: Message,
    },
    MessageAcked {
        message_id: String,
    },
    BroadcastAcked {
        message_id: String,
        agent_id: String,
    },
    ReindexEnqueued {
        job: ReindexJob,
    },
    ReindexStatusSet {
        track: String,
        trigger_commit: String,
        status: ReindexStatus,
    },
}
