// SPDX-License-Identifier: MIT

//! `Store`: the mutation/query facade over [`MaterializedState`], backing
//! both the message log (spec §4.A) and the state store (spec §4.B).
//!
//! Every mutating method computes a [`StoreEvent`], applies it to the
//! in-memory state, and appends it to the WAL before returning — so a
//! successful call is durable by the time it returns.

use crate::error::StoreError;
use crate::snapshot::Snapshot;
use crate::state::MaterializedState;
use crate::store_event::StoreEvent;
use crate::wal::Wal;
use parking_lot::Mutex;
use railyard_core::{
    Car, CarDep, CarProgress, CarStatus, CarType, Clock, Engine, EngineStatus, IdGen, Message,
    Priority, ReindexJob, ReindexStatus,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options accepted by [`Store::send`].
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub car_id: String,
    pub thread_id: Option<String>,
    pub priority: Priority,
}

pub struct Store {
    state: Mutex<MaterializedState>,
    wal: Mutex<Wal>,
    snapshot_path: PathBuf,
    id_gen: Arc<dyn IdGen>,
    clock: Arc<dyn Clock>,
}

impl Store {
    /// Open (or create) the store at `dir`, replaying `state.snapshot` + `wal.jsonl`.
    pub fn open(dir: &Path, id_gen: Arc<dyn IdGen>, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let snapshot_path = dir.join("state.snapshot");
        let wal_path = dir.join("wal.jsonl");

        let (mut state, processed_seq) = match Snapshot::load(&snapshot_path)? {
            Some(snap) => (snap.state, snap.seq),
            None => (MaterializedState::default(), 0),
        };

        let mut wal = Wal::open(&wal_path, processed_seq)?;
        let mut last_seq = processed_seq;
        while let Some(entry) = wal.next_unprocessed()? {
            state.apply_event(&entry.event);
            last_seq = entry.seq;
        }
        wal.mark_processed(last_seq);

        Ok(Self {
            state: Mutex::new(state),
            wal: Mutex::new(wal),
            snapshot_path,
            id_gen,
            clock,
        })
    }

    fn commit(&self, event: StoreEvent) -> Result<(), StoreError> {
        let seq = self.wal.lock().append(&event)?;
        self.state.lock().apply_event(&event);
        self.wal.lock().mark_processed(seq);
        Ok(())
    }

    /// Write a fresh snapshot and truncate the WAL before it.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        let state = self.state.lock().clone();
        let mut wal = self.wal.lock();
        let seq = wal.write_seq();
        Snapshot::new(seq, state).save(&self.snapshot_path)?;
        wal.truncate_before(seq + 1)?;
        Ok(())
    }

    /// Run a read-only closure against the current state under lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&MaterializedState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Current epoch milliseconds per the store's clock.
    pub fn now(&self) -> u64 {
        self.clock.epoch_ms()
    }

    // ---- state store (spec §4.B) ----

    pub fn get_car(&self, id: &str) -> Option<Car> {
        self.state.lock().get_car(id).cloned()
    }

    pub fn get_engine(&self, id: &str) -> Option<Engine> {
        self.state.lock().get_engine(id).cloned()
    }

    pub fn ready_work_count(&self, track: &str) -> usize {
        self.state.lock().ready_work_count(track)
    }

    pub fn stale_engines(&self, threshold_ms: u64) -> Vec<Engine> {
        let now = self.now();
        self.state
            .lock()
            .stale_engines(now, threshold_ms)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn dependents_of(&self, car_id: &str) -> Vec<Car> {
        self.state.lock().dependents_of(car_id).into_iter().cloned().collect()
    }

    pub fn children_of(&self, epic_id: &str) -> Vec<Car> {
        self.state.lock().children_of(epic_id).into_iter().cloned().collect()
    }

    pub fn progress_for(&self, car_id: &str) -> Vec<CarProgress> {
        self.state.lock().progress_for(car_id).to_vec()
    }

    pub fn engines(&self) -> Vec<Engine> {
        self.state.lock().engines.values().cloned().collect()
    }

    pub fn cars_by_status(&self, status: CarStatus) -> Vec<Car> {
        self.state
            .lock()
            .cars
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect()
    }

    pub fn cars_on_track(&self, track: &str) -> Vec<Car> {
        self.state
            .lock()
            .cars
            .values()
            .filter(|c| c.track == track)
            .cloned()
            .collect()
    }

    /// Insert a car row. Used by test fixtures and adapters that learn of
    /// externally-authored cars; the Yardmaster itself never authors cars.
    pub fn create_car(&self, car: Car) -> Result<(), StoreError> {
        self.commit(StoreEvent::CarCreated { car })
    }

    pub fn set_car_status(&self, car_id: &str, status: CarStatus) -> Result<(), StoreError> {
        if self.get_car(car_id).is_none() {
            return Err(StoreError::CarNotFound(car_id.to_string()));
        }
        let completed_at = if status == CarStatus::Done || status == CarStatus::Merged {
            Some(self.now())
        } else {
            None
        };
        self.commit(StoreEvent::CarStatusSet {
            car_id: car_id.to_string(),
            status,
            completed_at,
        })
    }

    pub fn set_car_assignee(&self, car_id: &str, assignee: &str) -> Result<(), StoreError> {
        if self.get_car(car_id).is_none() {
            return Err(StoreError::CarNotFound(car_id.to_string()));
        }
        self.commit(StoreEvent::CarAssigneeSet {
            car_id: car_id.to_string(),
            assignee: assignee.to_string(),
        })
    }

    pub fn set_car_branch(&self, car_id: &str, branch: &str, base_branch: &str) -> Result<(), StoreError> {
        if self.get_car(car_id).is_none() {
            return Err(StoreError::CarNotFound(car_id.to_string()));
        }
        self.commit(StoreEvent::CarBranchSet {
            car_id: car_id.to_string(),
            branch: branch.to_string(),
            base_branch: base_branch.to_string(),
        })
    }

    pub fn add_dep(&self, car_id: &str, blocked_by: &str) -> Result<(), StoreError> {
        self.commit(StoreEvent::CarDepAdded {
            dep: CarDep {
                car_id: car_id.to_string(),
                blocked_by: blocked_by.to_string(),
                dep_type: railyard_core::DepType::Blocks,
            },
        })
    }

    pub fn is_blocked(&self, car_id: &str) -> bool {
        self.state.lock().is_blocked(car_id)
    }

    /// Find dependents of `resolved_car_id` that are no longer blocked and
    /// move them from `blocked` to `open` (§4.E post-merge dependency unblock).
    pub fn unblock_dependents(&self, resolved_car_id: &str) -> Result<Vec<Car>, StoreError> {
        let candidates: Vec<String> = self
            .state
            .lock()
            .dependents_of(resolved_car_id)
            .into_iter()
            .filter(|c| c.status == CarStatus::Blocked)
            .map(|c| c.id.clone())
            .collect();

        let mut unblocked = Vec::new();
        for car_id in candidates {
            if !self.is_blocked(&car_id) {
                self.set_car_status(&car_id, CarStatus::Open)?;
                if let Some(car) = self.get_car(&car_id) {
                    unblocked.push(car);
                }
            }
        }
        Ok(unblocked)
    }

    /// Auto-close an epic once every child has reached a terminal, successful
    /// status. No-op (returns `false`) if the car isn't an epic, has no
    /// children, or any child is still outstanding.
    pub fn try_close_epic(&self, epic_id: &str) -> Result<bool, StoreError> {
        let epic = match self.get_car(epic_id) {
            Some(c) if c.kind == CarType::Epic => c,
            _ => return Ok(false),
        };
        if epic.status.is_terminal() || epic.status == CarStatus::Done {
            return Ok(false);
        }
        let children = self.children_of(epic_id);
        if children.is_empty() {
            return Ok(false);
        }
        if !children.iter().all(|c| c.status.unblocks_dependents()) {
            return Ok(false);
        }
        self.set_car_status(epic_id, CarStatus::Done)?;
        Ok(true)
    }

    pub fn add_progress(
        &self,
        car_id: &str,
        engine_id: &str,
        note: &str,
        files_changed: Vec<String>,
    ) -> Result<CarProgress, StoreError> {
        let progress = CarProgress {
            car_id: car_id.to_string(),
            engine_id: engine_id.to_string(),
            note: note.to_string(),
            files_changed,
            created_at: self.now(),
        };
        self.commit(StoreEvent::ProgressAdded {
            progress: progress.clone(),
        })?;
        Ok(progress)
    }

    /// Count consecutive `switch:<category>:...` progress notes for a car,
    /// used against `max_switch_failures` (§7).
    pub fn switch_failure_count(&self, car_id: &str) -> usize {
        self.state
            .lock()
            .progress_for(car_id)
            .iter()
            .filter(|p| p.is_switch_note())
            .count()
    }

    pub fn upsert_engine(&self, engine: Engine) -> Result<(), StoreError> {
        self.commit(StoreEvent::EngineUpserted { engine })
    }

    pub fn set_engine_status(
        &self,
        engine_id: &str,
        status: EngineStatus,
        current_car: Option<&str>,
    ) -> Result<(), StoreError> {
        if self.get_engine(engine_id).is_none() {
            return Err(StoreError::EngineNotFound(engine_id.to_string()));
        }
        self.commit(StoreEvent::EngineStatusSet {
            engine_id: engine_id.to_string(),
            status,
            current_car: current_car.map(|s| s.to_string()),
        })
    }

    pub fn heartbeat(&self, engine_id: &str) -> Result<(), StoreError> {
        if self.get_engine(engine_id).is_none() {
            return Err(StoreError::EngineNotFound(engine_id.to_string()));
        }
        self.commit(StoreEvent::EngineHeartbeat {
            engine_id: engine_id.to_string(),
            last_activity: self.now(),
        })
    }

    pub fn remove_engine(&self, engine_id: &str) -> Result<(), StoreError> {
        self.commit(StoreEvent::EngineRemoved {
            engine_id: engine_id.to_string(),
        })
    }

    pub fn enqueue_reindex(&self, track: &str, trigger_commit: &str) -> Result<ReindexJob, StoreError> {
        let job = ReindexJob::new(track, trigger_commit, self.now());
        self.commit(StoreEvent::ReindexEnqueued { job: job.clone() })?;
        Ok(job)
    }

    pub fn set_reindex_status(
        &self,
        track: &str,
        trigger_commit: &str,
        status: ReindexStatus,
    ) -> Result<(), StoreError> {
        self.commit(StoreEvent::ReindexStatusSet {
            track: track.to_string(),
            trigger_commit: trigger_commit.to_string(),
            status,
        })
    }

    // ---- message log (spec §4.A) ----

    pub fn send(
        &self,
        from_agent: &str,
        to_agent: &str,
        subject: &str,
        body: &str,
        opts: SendOptions,
    ) -> Result<Message, StoreError> {
        if to_agent.is_empty() {
            return Err(StoreError::Validation("to_agent must not be empty".into()));
        }
        let message = Message {
            id: self.id_gen.next(),
            from_agent: from_agent.to_string(),
            to_agent: to_agent.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            car_id: opts.car_id,
            thread_id: opts.thread_id,
            priority: opts.priority,
            acknowledged: false,
            created_at: self.now(),
        };
        self.commit(StoreEvent::MessageSent {
            message: message.clone(),
        })?;
        Ok(message)
    }

    /// Reply to `parent_id`, inheriting its thread (§3 Invariant 4).
    pub fn reply(&self, parent_id: &str, from_agent: &str, body: &str) -> Result<Message, StoreError> {
        let parent = self
            .get_message(parent_id)
            .ok_or_else(|| StoreError::MessageNotFound(parent_id.to_string()))?;
        let thread_id = parent.thread_for_reply();
        self.send(
            from_agent,
            &parent.from_agent,
            &format!("Re: {}", parent.subject),
            body,
            SendOptions {
                car_id: parent.car_id.clone(),
                thread_id: Some(thread_id),
                priority: Priority::Normal,
            },
        )
    }

    pub fn get_message(&self, id: &str) -> Option<Message> {
        self.state.lock().get_message(id).cloned()
    }

    /// Messages addressed to `agent_id`: direct unacknowledged messages plus
    /// broadcasts that agent hasn't acked yet, sorted `(priority ASC, created_at ASC)`.
    pub fn inbox(&self, agent_id: &str) -> Vec<Message> {
        let mut messages: Vec<Message> = self.state.lock().inbox(agent_id).into_iter().cloned().collect();
        messages.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.created_at.cmp(&b.created_at)));
        messages
    }

    pub fn thread(&self, thread_id: &str) -> Vec<Message> {
        let mut messages: Vec<Message> = self.state.lock().thread(thread_id).into_iter().cloned().collect();
        messages.sort_by_key(|m| m.created_at);
        messages
    }

    pub fn ack(&self, message_id: &str) -> Result<(), StoreError> {
        let message = self
            .get_message(message_id)
            .ok_or_else(|| StoreError::MessageNotFound(message_id.to_string()))?;
        if message.acknowledged {
            return Err(StoreError::AlreadyAcknowledged(message_id.to_string()));
        }
        self.commit(StoreEvent::MessageAcked {
            message_id: message_id.to_string(),
        })
    }

    /// §3 Invariant 3: broadcast acks are tracked per-recipient, never on the
    /// `Message` row itself.
    pub fn ack_broadcast(&self, message_id: &str, agent_id: &str) -> Result<(), StoreError> {
        let message = self
            .get_message(message_id)
            .ok_or_else(|| StoreError::MessageNotFound(message_id.to_string()))?;
        if !message.recipient().is_broadcast() {
            return Err(StoreError::Validation(format!(
                "{message_id} is not a broadcast message"
            )));
        }
        self.commit(StoreEvent::BroadcastAcked {
            message_id: message_id.to_string(),
            agent_id: agent_id.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
