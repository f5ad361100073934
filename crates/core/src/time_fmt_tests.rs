// SPDX-License-Identifier: MIT

use super::{format_elapsed, format_elapsed_ms};

#[test]
fn elapsed_covers_every_bucket() {
    assert_eq!(format_elapsed(0), "0s");
    assert_eq!(format_elapsed(59), "59s");
    assert_eq!(format_elapsed(60), "1m");
    assert_eq!(format_elapsed(3599), "59m");
    assert_eq!(format_elapsed(3600), "1h");
    assert_eq!(format_elapsed(3660), "1h1m");
    assert_eq!(format_elapsed(7200), "2h");
    assert_eq!(format_elapsed(86399), "23h59m");
    assert_eq!(format_elapsed(86400), "1d");
    assert_eq!(format_elapsed(172800), "2d");
}

#[test]
fn elapsed_ms_delegates_to_seconds() {
    assert_eq!(format_elapsed_ms(5_000), "5s");
    assert_eq!(format_elapsed_ms(120_000), "2m");
    assert_eq!(format_elapsed_ms(3_600_000), "1h");
}
