// SPDX-License-Identifier: MIT

//! Rebalancer (§4.H): moves idle engine capacity from surplus tracks to
//! deficit tracks, at most one move per deficit per tick.

use std::collections::HashMap;

use railyard_adapters::OrchestratorAdapter;
use railyard_core::EngineStatus;
use railyard_storage::Store;
use tracing::info;

use crate::defaults::{IDLE_THRESHOLD, REBALANCE_COOLDOWN, TRACK_COOLDOWN};
use crate::YardmasterError;

/// A track the rebalancer is allowed to move capacity into/out of.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    pub name: String,
    pub max_slots: u32,
}

struct TrackMetrics {
    live_count: u32,
    idle_count: u32,
    ready_work: usize,
    max_slots: u32,
    idle_engines: Vec<String>,
}

/// In-memory rebalancer state. Not persisted: it spans only the daemon
/// process's lifetime, reset on restart.
#[derive(Debug, Clone, Default)]
pub struct Rebalancer {
    last_rebalance_at: Option<u64>,
    last_move_at: HashMap<String, u64>,
}

impl Rebalancer {
    pub fn new() -> Self {
        Self::default()
    }

    fn on_cooldown(&self, track: &str, now_ms: u64, cooldown_ms: u64) -> bool {
        self.last_move_at
            .get(track)
            .is_some_and(|&t| now_ms.saturating_sub(t) < cooldown_ms)
    }

    /// Runs one rebalance tick. No-op if the global cooldown hasn't elapsed.
    pub async fn tick<O>(
        &mut self,
        store: &Store,
        orchestrator: &O,
        tracks: &[TrackConfig],
        now_ms: u64,
    ) -> Result<(), YardmasterError>
    where
        O: OrchestratorAdapter,
    {
        let cooldown_ms = REBALANCE_COOLDOWN.as_millis() as u64;
        if let Some(last) = self.last_rebalance_at {
            if now_ms.saturating_sub(last) < cooldown_ms {
                return Ok(());
            }
        }

        let idle_threshold_ms = IDLE_THRESHOLD.as_millis() as u64;
        let track_cooldown_ms = TRACK_COOLDOWN.as_millis() as u64;

        let mut metrics: HashMap<String, TrackMetrics> = HashMap::new();
        let all_engines = store.engines();
        for t in tracks {
            let live: Vec<_> = all_engines
                .iter()
                .filter(|e| e.track == t.name && e.status != EngineStatus::Dead && !e.is_yardmaster())
                .collect();
            let idle_engines: Vec<String> = live
                .iter()
                .filter(|e| e.is_idle() && now_ms.saturating_sub(e.last_activity) >= idle_threshold_ms)
                .map(|e| e.id.clone())
                .collect();
            metrics.insert(
                t.name.clone(),
                TrackMetrics {
                    live_count: live.len() as u32,
                    idle_count: idle_engines.len() as u32,
                    ready_work: store.ready_work_count(&t.name),
                    max_slots: t.max_slots,
                    idle_engines,
                },
            );
        }

        let mut deficits: Vec<(String, usize)> = metrics
            .iter()
            .filter(|(_, m)| m.ready_work > m.live_count as usize && m.live_count < m.max_slots)
            .map(|(name, m)| (name.clone(), m.ready_work.saturating_sub(m.live_count as usize)))
            .collect();
        deficits.sort_by(|a, b| b.1.cmp(&a.1));

        let mut donors_used = std::collections::HashSet::new();

        for (deficit_track, backlog) in deficits {
            if self.on_cooldown(&deficit_track, now_ms, track_cooldown_ms) {
                continue;
            }

            let donor_name = metrics
                .iter()
                .filter(|(name, _)| name.as_str() != deficit_track.as_str())
                .filter(|(name, _)| !donors_used.contains(name.as_str()))
                .filter(|(name, _)| !self.on_cooldown(name, now_ms, track_cooldown_ms))
                .filter(|(_, m)| m.idle_count > 0)
                .filter(|(_, m)| m.ready_work == 0 || m.live_count > 1)
                .map(|(name, _)| name.clone())
                .next();

            let Some(donor_name) = donor_name else {
                continue;
            };

            let engine_id = match metrics.get_mut(&donor_name) {
                Some(m) => m.idle_engines.pop(),
                None => None,
            };
            let Some(engine_id) = engine_id else {
                continue;
            };

            info!(donor = %donor_name, receiver = %deficit_track, backlog, "rebalancing a move");
            store.set_engine_status(&engine_id, EngineStatus::Dead, Some(""))?;

            if let Some(m) = metrics.get_mut(&donor_name) {
                m.idle_count = m.idle_count.saturating_sub(1);
                m.live_count = m.live_count.saturating_sub(1);
            }

            let target = metrics.get(&deficit_track).map_or(1, |m| m.live_count + 1);
            let _ = orchestrator.scale(&deficit_track, target).await;
            if let Some(m) = metrics.get_mut(&deficit_track) {
                m.live_count = target;
            }

            self.last_move_at.insert(donor_name.clone(), now_ms);
            self.last_move_at.insert(deficit_track.clone(), now_ms);
            donors_used.insert(donor_name);
        }

        self.last_rebalance_at = Some(now_ms);
        Ok(())
    }
}

#[cfg(test)]
#[path = "rebalancer_tests.rs"]
mod tests;
