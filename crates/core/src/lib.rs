// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! railyard-core: domain types shared by every Railyard crate.

pub mod car;
pub mod car_dep;
pub mod car_progress;
pub mod clock;
pub mod engine;
pub mod id;
pub mod message;
pub mod reindex;
pub mod time_fmt;

pub use car::{Car, CarStatus, CarType};
pub use car_dep::{CarDep, DepType};
pub use car_progress::CarProgress;
pub use clock::{Clock, FakeClock, SystemClock};
pub use engine::{Engine, EngineStatus, YARDMASTER_ID, SUPERVISOR_TRACK};
pub use id::{CarId, EngineId, IdGen, MessageId, SequentialIdGen, ShortId, UuidIdGen};
pub use message::{BroadcastAck, Message, Priority, Recipient, BROADCAST, HUMAN};
pub use reindex::{ReindexJob, ReindexStatus};
pub use time_fmt::format_elapsed;
