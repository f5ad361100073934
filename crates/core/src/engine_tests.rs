// SPDX-License-Identifier: MIT

use super::*;

fn base_engine() -> Engine {
    Engine {
        id: "eng-1".into(),
        track: "backend".into(),
        role: "engine".into(),
        status: EngineStatus::Idle,
        current_car: String::new(),
        started_at: 0,
        last_activity: 0,
    }
}

#[test]
fn new_yardmaster_has_wildcard_track() {
    let e = Engine::new_yardmaster(1000);
    assert_eq!(e.id, YARDMASTER_ID);
    assert_eq!(e.track, SUPERVISOR_TRACK);
    assert!(e.is_yardmaster());
    assert_eq!(e.status, EngineStatus::Idle);
}

#[test]
fn stale_when_past_threshold_and_not_dead() {
    let mut e = base_engine();
    e.last_activity = 0;
    assert!(e.is_stale(61_000, 60_000));
    assert!(!e.is_stale(59_000, 60_000));
}

#[test]
fn dead_engine_never_stale() {
    let mut e = base_engine();
    e.status = EngineStatus::Dead;
    e.last_activity = 0;
    assert!(!e.is_stale(1_000_000, 60_000));
}

#[test]
fn idle_requires_no_current_car() {
    let mut e = base_engine();
    assert!(e.is_idle());
    e.current_car = "car-1".into();
    assert!(!e.is_idle());
}
