// SPDX-License-Identifier: MIT

//! Escalation oracle prompt construction and decision parsing (§4.D).

use railyard_adapters::{NotifyAdapter, NotifyContext, OracleAdapter};
use railyard_core::{CarStatus, Priority, HUMAN, YARDMASTER_ID};
use railyard_storage::{SendOptions, Store};

use crate::YardmasterError;

/// Inputs to an escalation: the car/engine in question (either may be
/// absent for engine-only escalations) and the reason the yardmaster is
/// asking for guidance.
#[derive(Debug, Clone)]
pub struct EscalationRequest {
    pub car_id: Option<String>,
    pub engine_id: Option<String>,
    pub reason: String,
    pub details: String,
}

/// The oracle's decision, parsed from its raw stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationDecision {
    Reassign,
    Guidance(String),
    EscalateHuman(String),
    Retry,
    Skip(String),
}

const ACTIONS: &str = "Available actions:\n\
    REASSIGN - release the car back to the pool\n\
    GUIDANCE:<msg> - send guidance to the engine\n\
    ESCALATE_HUMAN:<msg> - escalate to a human operator\n\
    RETRY - let the engine retry\n\
    SKIP - take no action\n";

/// Builds the prompt sent to the oracle: car core fields + five most recent
/// progress notes (when a store and car id are available) plus the fixed
/// action list.
pub fn build_prompt(store: &Store, request: &EscalationRequest) -> String {
    let mut prompt = format!(
        "reason: {}\ndetails: {}\n",
        request.reason, request.details
    );

    if let Some(car_id) = &request.car_id {
        if let Some(car) = store.get_car(car_id) {
            prompt.push_str(&format!(
                "car: id={} title={} status={:?} track={} assignee={}\n",
                car.id, car.title, car.status, car.track, car.assignee
            ));

            let mut notes = store.progress_for(car_id);
            notes.sort_by_key(|p| p.created_at);
            for note in notes.iter().rev().take(5) {
                prompt.push_str(&format!("progress: {}\n", note.note));
            }
        }
    }

    if let Some(engine_id) = &request.engine_id {
        prompt.push_str(&format!("engine: {engine_id}\n"));
    }

    prompt.push_str(ACTIONS);
    prompt
}

/// Parses the oracle's stdout into a decision. Line-oriented: takes the
/// first matching line, trimming whitespace. Anything unrecognized or
/// empty yields `Skip("unrecognized response")`.
pub fn parse_decision(output: &str) -> EscalationDecision {
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "REASSIGN" {
            return EscalationDecision::Reassign;
        }
        if let Some(msg) = line.strip_prefix("GUIDANCE:") {
            return EscalationDecision::Guidance(msg.trim().to_string());
        }
        if let Some(msg) = line.strip_prefix("ESCALATE_HUMAN:") {
            return EscalationDecision::EscalateHuman(msg.trim().to_string());
        }
        if line == "RETRY" {
            return EscalationDecision::Retry;
        }
        if line == "SKIP" {
            return EscalationDecision::Skip(String::new());
        }
    }
    EscalationDecision::Skip("unrecognized response".to_string())
}

/// Applies an oracle decision: the shared handler used by both the
/// switch-escalation policy and the inbox dispatcher's `help`/`stuck` case.
pub async fn apply_decision<N: NotifyAdapter>(
    store: &Store,
    notify: &N,
    decision: &EscalationDecision,
    request: &EscalationRequest,
) -> Result<(), YardmasterError> {
    match decision {
        EscalationDecision::Reassign => {
            if let Some(car_id) = &request.car_id {
                store.set_car_status(car_id, CarStatus::Open)?;
                store.set_car_assignee(car_id, "")?;
                store.add_progress(
                    car_id,
                    YARDMASTER_ID,
                    &format!("Reassigned: {}", request.reason),
                    vec![],
                )?;
            }
        }
        EscalationDecision::Guidance(msg) => {
            if let Some(engine_id) = &request.engine_id {
                let opts = SendOptions {
                    car_id: request.car_id.clone().unwrap_or_default(),
                    ..Default::default()
                };
                store.send(YARDMASTER_ID, engine_id, "guidance", msg, opts)?;
            }
        }
        EscalationDecision::EscalateHuman(msg) => {
            let opts = SendOptions {
                car_id: request.car_id.clone().unwrap_or_default(),
                priority: Priority::Urgent,
                ..Default::default()
            };
            let sent = store.send(YARDMASTER_ID, HUMAN, "escalation", msg, opts)?;
            let _ = notify
                .notify(&NotifyContext {
                    from: YARDMASTER_ID.to_string(),
                    to: HUMAN.to_string(),
                    subject: sent.subject.clone(),
                    body: sent.body.clone(),
                    car_id: request.car_id.clone().unwrap_or_default(),
                    priority: "urgent".to_string(),
                })
                .await;
        }
        EscalationDecision::Retry | EscalationDecision::Skip(_) => {}
    }
    Ok(())
}

/// Builds the prompt, asks the oracle, parses its answer, and applies the
/// resulting decision. The single entry point both the switch-escalation
/// policy and the inbox dispatcher's `help`/`stuck` handler go through.
pub async fn run_escalation<O, N>(
    store: &Store,
    oracle: &O,
    notify: &N,
    request: &EscalationRequest,
) -> Result<EscalationDecision, YardmasterError>
where
    O: OracleAdapter,
    N: NotifyAdapter,
{
    let prompt = build_prompt(store, request);
    let output = oracle.ask(&prompt).await?;
    let decision = parse_decision(&output);
    apply_decision(store, notify, &decision, request).await?;
    Ok(decision)
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
