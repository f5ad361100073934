// SPDX-License-Identifier: MIT

//! Named constants for yardmaster tuning knobs. Collaborators override any
//! of these through `SwitchOptions`/`LivenessOptions`/`RebalanceOptions`.

use std::time::Duration;

/// Reserved engine id for the yardmaster's own row in the engine table.
pub const YARDMASTER_ID: &str = "yardmaster";

/// Default daemon-loop poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default staleness threshold for the liveness controller.
pub const STALE_THRESHOLD_SECS: u64 = 60;

/// Default `go test ./...` is the only hardcoded test command; collaborators
/// building non-Go tracks MUST override it.
pub const DEFAULT_TEST_COMMAND: &str = "go test ./...";

/// Default threshold for the switch-escalation policy's repeated-failure path.
pub const MAX_SWITCH_FAILURES: u32 = 3;

/// Rebalancer cooldowns and thresholds.
pub const REBALANCE_COOLDOWN: Duration = Duration::from_secs(5 * 60);
pub const TRACK_COOLDOWN: Duration = Duration::from_secs(5 * 60);
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(2 * 60);

/// Output substrings that indicate "no tests ran" rather than a real failure.
pub const NO_TESTS_PATTERNS: &[&str] = &["no test files", "No tests found", "No test suites found"];

/// Output substrings (case-insensitive) that indicate an infrastructure
/// failure rather than a genuine test failure.
pub const INFRA_FAILURE_PATTERNS: &[&str] = &[
    "command not found",
    "permission denied",
    "cannot connect to the docker daemon",
    "econnrefused",
    "no configuration file provided",
    "is not installed",
];
