// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn fake_clock_starts_at_given_epoch() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.epoch_ms(), 1_000);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new(1_000);
    clock.advance_ms(500);
    assert_eq!(clock.epoch_ms(), 1_500);
}

#[test]
fn fake_clock_set_overrides() {
    let clock = FakeClock::new(1_000);
    clock.set_ms(9_999);
    assert_eq!(clock.epoch_ms(), 9_999);
}

#[test]
fn system_clock_is_monotonic_non_decreasing() {
    let clock = SystemClock;
    let a = clock.epoch_ms();
    let b = clock.epoch_ms();
    assert!(b >= a);
}
