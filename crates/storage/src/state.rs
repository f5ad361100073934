// SPDX-License-Identifier: MIT

//! Materialized state built from store-event replay.

use crate::store_event::StoreEvent;
use railyard_core::{
    Car, CarDep, CarProgress, CarStatus, Engine, EngineStatus, Message, ReindexJob, ReindexStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Materialized state derived from the store event log.
///
/// All fields are public to the crate so that `Store` (the mutation/query
/// facade) and tests can inspect state directly; external callers only see
/// `Store`'s methods.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MaterializedState {
    pub cars: HashMap<String, Car>,
    pub engines: HashMap<String, Engine>,
    #[serde(default)]
    pub car_deps: Vec<CarDep>,
    #[serde(default)]
    pub progress: HashMap<String, Vec<CarProgress>>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub broadcast_acks: HashSet<(String, String)>,
    #[serde(default)]
    pub reindex_jobs: Vec<ReindexJob>,
}

impl MaterializedState {
    /// Apply a single store event. Must be idempotent.
    pub fn apply_event(&mut self, event: &StoreEvent) {
        match event {
            StoreEvent::CarCreated { car } => {
                self.cars.entry(car.id.clone()).or_insert_with(|| car.clone());
            }
            StoreEvent::CarStatusSet {
                car_id,
                status,
                completed_at,
            } => {
                if let Some(car) = self.cars.get_mut(car_id) {
                    car.status = status.clone();
                    if completed_at.is_some() {
                        car.completed_at = *completed_at;
                    }
                }
            }
            StoreEvent::CarAssigneeSet { car_id, assignee } => {
                if let Some(car) = self.cars.get_mut(car_id) {
                    car.assignee = assignee.clone();
                }
            }
            StoreEvent::CarBranchSet {
                car_id,
                branch,
                base_branch,
            } => {
                if let Some(car) = self.cars.get_mut(car_id) {
                    car.branch = branch.clone();
                    if !base_branch.is_empty() {
                        car.base_branch = base_branch.clone();
                    }
                }
            }
            StoreEvent::CarVarsUpdated { car_id, vars } => {
                if let Some(car) = self.cars.get_mut(car_id) {
                    for (k, v) in vars {
                        car.vars.insert(k.clone(), v.clone());
                    }
                }
            }
            StoreEvent::CarDepAdded { dep } => {
                if !self
                    .car_deps
                    .iter()
                    .any(|d| d.car_id == dep.car_id && d.blocked_by == dep.blocked_by)
                {
                    self.car_deps.push(dep.clone());
                }
            }
            StoreEvent::ProgressAdded { progress } => {
                let entries = self.progress.entry(progress.car_id.clone()).or_default();
                if !entries
                    .iter()
                    .any(|p| p.created_at == progress.created_at && p.note == progress.note)
                {
                    entries.push(progress.clone());
                }
            }
            StoreEvent::EngineUpserted { engine } => {
                self.engines.insert(engine.id.clone(), engine.clone());
            }
            StoreEvent::EngineStatusSet {
                engine_id,
                status,
                current_car,
            } => {
                if let Some(engine) = self.engines.get_mut(engine_id) {
                    engine.status = status.clone();
                    if let Some(car) = current_car {
                        engine.current_car = car.clone();
                    }
                }
            }
            StoreEvent::EngineHeartbeat {
                engine_id,
                last_activity,
            } => {
                if let Some(engine) = self.engines.get_mut(engine_id) {
                    engine.last_activity = *last_activity;
                }
            }
            StoreEvent::EngineRemoved { engine_id } => {
                self.engines.remove(engine_id);
            }
            StoreEvent::MessageSent { message } => {
                if !self.messages.iter().any(|m| m.id == message.id) {
                    self.messages.push(message.clone());
                }
            }
            StoreEvent::MessageAcked { message_id } => {
                if let Some(m) = self.messages.iter_mut().find(|m| &m.id == message_id) {
                    m.acknowledged = true;
                }
            }
            StoreEvent::BroadcastAcked {
                message_id,
                agent_id,
            } => {
                self.broadcast_acks
                    .insert((message_id.clone(), agent_id.clone()));
            }
            StoreEvent::ReindexEnqueued { job } => {
                if !self
                    .reindex_jobs
                    .iter()
                    .any(|j| j.track == job.track && j.trigger_commit == job.trigger_commit)
                {
                    self.reindex_jobs.push(job.clone());
                }
            }
            StoreEvent::ReindexStatusSet {
                track,
                trigger_commit,
                status,
            } => {
                if let Some(job) = self
                    .reindex_jobs
                    .iter_mut()
                    .find(|j| &j.track == track && &j.trigger_commit == trigger_commit)
                {
                    job.status = status.clone();
                }
            }
        }
    }

    /// Get a car by id or unique prefix.
    pub fn get_car(&self, id: &str) -> Option<&Car> {
        if let Some(car) = self.cars.get(id) {
            return Some(car);
        }
        let matches: Vec<_> = self.cars.iter().filter(|(k, _)| k.starts_with(id)).collect();
        if matches.len() == 1 {
            Some(matches[0].1)
        } else {
            None
        }
    }

    pub fn get_engine(&self, id: &str) -> Option<&Engine> {
        self.engines.get(id)
    }

    /// Number of cars ready to be claimed on a track: status `open`, not an
    /// epic, no unresolved blockers, and (per §3 invariant) an empty assignee.
    pub fn ready_work_count(&self, track: &str) -> usize {
        self.cars
            .values()
            .filter(|c| c.track == track && c.status == CarStatus::Open && c.assignee.is_empty())
            .filter(|c| !c.is_epic())
            .filter(|c| !self.is_blocked(&c.id))
            .count()
    }

    /// Engines whose last activity predates `now_ms - threshold_ms` and are
    /// not already marked dead.
    pub fn stale_engines(&self, now_ms: u64, threshold_ms: u64) -> Vec<&Engine> {
        self.engines
            .values()
            .filter(|e| e.is_stale(now_ms, threshold_ms))
            .collect()
    }

    /// True if any dependency of `car_id` is not yet resolved (blocking car
    /// is not Done/Merged/Cancelled).
    pub fn is_blocked(&self, car_id: &str) -> bool {
        self.car_deps.iter().any(|dep| {
            dep.car_id == car_id
                && self
                    .cars
                    .get(&dep.blocked_by)
                    .map(|blocker| !blocker.status.unblocks_dependents())
                    .unwrap_or(false)
        })
    }

    /// Cars that list `car_id` as a blocker.
    pub fn dependents_of(&self, car_id: &str) -> Vec<&Car> {
        self.car_deps
            .iter()
            .filter(|dep| dep.blocked_by == car_id)
            .filter_map(|dep| self.cars.get(&dep.car_id))
            .collect()
    }

    /// Children of an epic (cars whose `parent` is `epic_id`).
    pub fn children_of(&self, epic_id: &str) -> Vec<&Car> {
        self.cars
            .values()
            .filter(|c| c.parent.as_deref() == Some(epic_id))
            .collect()
    }

    pub fn progress_for(&self, car_id: &str) -> &[CarProgress] {
        self.progress.get(car_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn inbox(&self, agent_id: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| !m.acknowledged)
            .filter(|m| match m.recipient() {
                railyard_core::Recipient::Direct(to) => to == agent_id,
                railyard_core::Recipient::Broadcast => {
                    !self
                        .broadcast_acks
                        .contains(&(m.id.clone(), agent_id.to_string()))
                }
            })
            .collect()
    }

    pub fn thread(&self, thread_id: &str) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.thread_id.as_deref() == Some(thread_id))
            .collect()
    }

    pub fn get_message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
