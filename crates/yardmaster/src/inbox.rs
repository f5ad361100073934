// SPDX-License-Identifier: MIT

//! Inbox dispatcher (§4.G): drains the Yardmaster's own inbox and reacts to
//! the fixed set of subjects engines and humans send it.

use railyard_adapters::{NotifyAdapter, OracleAdapter, OrchestratorAdapter};
use railyard_core::{CarStatus, Message, YARDMASTER_ID};
use railyard_storage::{SendOptions, Store};
use tracing::info;

use crate::escalation::{run_escalation, EscalationRequest};
use crate::liveness::reassign_car;
use crate::YardmasterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Continue,
    Draining,
}

/// Processes every message currently in the Yardmaster's inbox, acking each
/// as it's handled. Returns `Draining` once a `drain` message is accepted.
pub async fn dispatch<O, R, N>(
    store: &Store,
    orchestrator: &O,
    oracle: &R,
    notify: &N,
    daemon_start_ms: u64,
) -> Result<DispatchOutcome, YardmasterError>
where
    O: OrchestratorAdapter,
    R: OracleAdapter,
    N: NotifyAdapter,
{
    let mut outcome = DispatchOutcome::Continue;

    for msg in store.inbox(YARDMASTER_ID) {
        let subject = msg.subject.to_lowercase();

        match subject.as_str() {
            "drain" => {
                if msg.created_at < daemon_start_ms {
                    info!("stale drain message, ignoring");
                } else {
                    outcome = DispatchOutcome::Draining;
                }
                ack(store, &msg)?;
            }
            "engine-stalled" => {
                if !msg.car_id.is_empty() {
                    store.add_progress(
                        &msg.car_id,
                        YARDMASTER_ID,
                        &format!("engine-stalled: {}", msg.body),
                        vec![],
                    )?;
                }
                if msg.from_agent != YARDMASTER_ID {
                    if let Some(engine) = store.get_engine(&msg.from_agent) {
                        let _ = orchestrator.restart_engine(&engine.id, &engine.track).await;
                    }
                }
                ack(store, &msg)?;
            }
            "help" | "stuck" => {
                ack(store, &msg)?;
                let request = EscalationRequest {
                    car_id: (!msg.car_id.is_empty()).then(|| msg.car_id.clone()),
                    engine_id: Some(msg.from_agent.clone()),
                    reason: subject.clone(),
                    details: msg.body.clone(),
                };
                run_escalation(store, oracle, notify, &request).await?;
            }
            "restart-engine" => {
                if let Some(engine) = active_engine_for_car(store, &msg.car_id) {
                    reassign_car(store, notify, &msg.car_id, &engine.id, "restart-engine request").await?;
                    let _ = orchestrator.restart_engine(&engine.id, &engine.track).await;
                }
                ack(store, &msg)?;
            }
            "retry-merge" => {
                if let Some(car) = store.get_car(&msg.car_id) {
                    if car.is_epic() {
                        crate::epic::try_close_epic(store, &car.id)?;
                    } else if matches!(car.status, CarStatus::Blocked | CarStatus::MergeFailed) {
                        store.set_car_status(&car.id, CarStatus::Done)?;
                        store.add_progress(&car.id, YARDMASTER_ID, "retry-merge requested", vec![])?;
                    }
                }
                ack(store, &msg)?;
            }
            "requeue-car" => {
                if !msg.car_id.is_empty() && store.get_car(&msg.car_id).is_some() {
                    store.set_car_status(&msg.car_id, CarStatus::Open)?;
                    store.set_car_assignee(&msg.car_id, "")?;
                }
                ack(store, &msg)?;
            }
            "nudge-engine" => {
                if let Some(car) = store.get_car(&msg.car_id) {
                    if !car.assignee.is_empty() {
                        let opts = SendOptions {
                            car_id: car.id.clone(),
                            ..Default::default()
                        };
                        store.send(YARDMASTER_ID, &car.assignee, "guidance", &msg.body, opts)?;
                    }
                }
                ack(store, &msg)?;
            }
            "unblock-car" => {
                if let Some(car) = store.get_car(&msg.car_id) {
                    if car.status == CarStatus::Blocked {
                        store.set_car_status(&car.id, CarStatus::Open)?;
                    }
                }
                ack(store, &msg)?;
            }
            "close-epic" => {
                if let Some(car) = store.get_car(&msg.car_id) {
                    if car.is_epic() {
                        crate::epic::try_close_epic(store, &car.id)?;
                    }
                }
                ack(store, &msg)?;
            }
            "reassignment" | "deps-unblocked" | "epic-closed" => {
                ack(store, &msg)?;
            }
            other if other.contains("done") || other.contains("complete") => {
                info!(subject = %msg.subject, from = %msg.from_agent, "advisory message");
                ack(store, &msg)?;
            }
            _ => {
                ack(store, &msg)?;
            }
        }
    }

    Ok(outcome)
}

fn active_engine_for_car(store: &Store, car_id: &str) -> Option<railyard_core::Engine> {
    if car_id.is_empty() {
        return None;
    }
    store
        .engines()
        .into_iter()
        .find(|e| e.current_car == car_id && e.status != railyard_core::EngineStatus::Dead)
}

fn ack(store: &Store, msg: &Message) -> Result<(), YardmasterError> {
    if msg.recipient().is_broadcast() {
        store.ack_broadcast(&msg.id, YARDMASTER_ID)?;
    } else {
        store.ack(&msg.id)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "inbox_tests.rs"]
mod tests;
