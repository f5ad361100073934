// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! railyard-yardmaster: the switch engine, liveness sweep, inbox dispatcher,
//! and rebalancer that make up the Yardmaster's daemon-loop phases.

pub mod defaults;
pub mod epic;
pub mod error;
pub mod escalation;
pub mod inbox;
pub mod liveness;
pub mod rebalancer;
pub mod switch;

pub use epic::try_close_epic;
pub use error::YardmasterError;
pub use escalation::{
    apply_decision, build_prompt, parse_decision, run_escalation, EscalationDecision, EscalationRequest,
};
pub use inbox::{dispatch as dispatch_inbox, DispatchOutcome};
pub use liveness::{reassign_car, sweep as liveness_sweep};
pub use rebalancer::{Rebalancer, TrackConfig};
pub use switch::{switch, FailureCategory, SwitchOptions, SwitchOutcome};
