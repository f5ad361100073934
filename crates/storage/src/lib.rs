// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Materialized state store for Railyard: the message log (§4.A) and the
//! shared car/engine state store (§4.B), durable via a JSONL write-ahead log.

mod error;
mod snapshot;
mod state;
mod store;
mod store_event;
mod wal;

pub use error::StoreError;
pub use snapshot::Snapshot;
pub use state::MaterializedState;
pub use store::{SendOptions, Store};
pub use store_event::StoreEvent;
pub use wal::{Wal, WalEntry};
