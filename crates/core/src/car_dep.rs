// SPDX-License-Identifier: MIT

//! CarDep: dependency edges between cars.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepType {
    Blocks,
    #[serde(other)]
    Other,
}

/// `(car_id, blocked_by, dep_type)` — a car is blocked if any `blocked_by`
/// points to a car whose status is not in {done, merged, cancelled}.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarDep {
    pub car_id: String,
    pub blocked_by: String,
    pub dep_type: DepType,
}

#[cfg(test)]
#[path = "car_dep_tests.rs"]
mod tests;
