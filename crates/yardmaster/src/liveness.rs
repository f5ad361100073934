// SPDX-License-Identifier: MIT

//! Liveness controller (§4.F): reaps stale engines, reassigns their work,
//! and asks the orchestrator for a replacement.

use railyard_adapters::{EngineCollaborator, NotifyAdapter, NotifyContext, OrchestratorAdapter};
use railyard_core::{CarStatus, EngineStatus, Priority, YARDMASTER_ID};
use railyard_storage::{SendOptions, Store};
use tracing::{info, warn};

use crate::defaults::STALE_THRESHOLD_SECS;
use crate::YardmasterError;

/// Reassigns `car_id`'s work away from a stale engine: opens the car, clears
/// its assignee, leaves a progress note, and broadcasts urgently.
pub async fn reassign_car<N: NotifyAdapter>(
    store: &Store,
    notify: &N,
    car_id: &str,
    engine_id: &str,
    reason: &str,
) -> Result<(), YardmasterError> {
    if store.get_car(car_id).is_none() {
        return Err(YardmasterError::NotFound(format!("car {car_id}")));
    }

    store.set_car_status(car_id, CarStatus::Open)?;
    store.set_car_assignee(car_id, "")?;
    store.add_progress(
        car_id,
        YARDMASTER_ID,
        &format!("Reassigned from engine {engine_id}: {reason}"),
        vec![],
    )?;

    let opts = SendOptions {
        car_id: car_id.to_string(),
        priority: Priority::Urgent,
        ..Default::default()
    };
    let msg = store.send(YARDMASTER_ID, railyard_core::BROADCAST, "reassignment", car_id, opts)?;
    let _ = notify
        .notify(&NotifyContext {
            from: YARDMASTER_ID.to_string(),
            to: railyard_core::BROADCAST.to_string(),
            subject: msg.subject.clone(),
            body: msg.body.clone(),
            car_id: car_id.to_string(),
            priority: "urgent".to_string(),
        })
        .await;
    Ok(())
}

/// Sweeps every non-yardmaster engine whose `last_activity` is stale: cleans
/// up its overlay, reassigns any attached car (or marks the engine dead
/// outright), and asks the orchestrator to restart a replacement.
pub async fn sweep<C, O, N>(store: &Store, collaborator: &C, orchestrator: &O, notify: &N) -> Result<(), YardmasterError>
where
    C: EngineCollaborator,
    O: OrchestratorAdapter,
    N: NotifyAdapter,
{
    let threshold_ms = STALE_THRESHOLD_SECS * 1000;
    let stale = store.stale_engines(threshold_ms);

    for engine in stale {
        if engine.is_yardmaster() {
            continue;
        }

        info!(engine_id = %engine.id, "reaping stale engine");
        collaborator.cleanup_overlay(&engine.id).await;

        if !engine.current_car.is_empty() {
            if let Err(e) = reassign_car(store, notify, &engine.current_car, &engine.id, "stale engine").await {
                warn!(engine_id = %engine.id, error = %e, "failed to reassign car from stale engine");
            }
            store.set_engine_status(&engine.id, EngineStatus::Dead, Some(""))?;
        } else {
            store.set_engine_status(&engine.id, EngineStatus::Dead, None)?;
        }

        if let Err(e) = orchestrator.restart_engine(&engine.id, &engine.track).await {
            warn!(engine_id = %engine.id, error = %e, "failed to request engine restart");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "liveness_tests.rs"]
mod tests;
