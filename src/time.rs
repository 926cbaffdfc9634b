//! Legacy instrument timestamps
//!
//! Extraction metrics store their acquisition time as a 64-bit tick value:
//! 100 ns ticks since 0001-01-01 in the low 62 bits, with the two high
//! bits reserved for the time-zone "kind". This module converts between that
//! encoding and Unix epoch seconds.
//!
//! The conversion reproduces the arithmetic the instrument software has always
//! used. In particular the kind bits are never honoured: local timestamps are
//! not shifted to UTC on decode and every encoded value is flagged as local.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ticks (100 ns) per second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01 and 1970-01-01
pub const TICKS_TO_1970: i64 = 621_355_968_000_000_000;

const TICKS_MASK: i64 = 0x3fff_ffff_ffff_ffff;
const KIND_LOCAL: u64 = 0x8000_0000_0000_0000;
const TICKS_CEILING: i64 = 0x3fff_ff36_d596_4000;
const TICKS_CYCLE: i64 = 0x4000_0000_0000_0000;
const LOCAL_WRAP_CORRECTION: i64 = 0xc9_2a69_c000;

/// Largest Unix time that survives a round trip through the legacy encoding
///
/// One second later the tick count crosses the normalization ceiling and
/// decodes as a wrapped value.
pub const MAX_UNIX_SECONDS: i64 = (TICKS_CEILING - TICKS_TO_1970) / TICKS_PER_SECOND;

/// Convert a legacy tick value to seconds since the Unix epoch
///
/// The result truncates toward zero.
pub fn to_unix_seconds(value: u64) -> i64 {
    let mut ticks = (value as i64) & TICKS_MASK;
    if ticks > TICKS_CEILING {
        ticks -= TICKS_CYCLE;
    }
    // TODO: apply the encoded kind once the local-time offset is recorded alongside the run
    if ticks < 0 {
        ticks += LOCAL_WRAP_CORRECTION;
    }
    (ticks - TICKS_TO_1970) / TICKS_PER_SECOND
}

/// Convert seconds since the Unix epoch to a legacy tick value flagged as local time
pub fn to_legacy_ticks(unix_seconds: i64) -> u64 {
    let mut ticks = unix_seconds
        .wrapping_mul(TICKS_PER_SECOND)
        .wrapping_add(TICKS_TO_1970);
    if ticks < 0 {
        ticks = ticks.wrapping_add(TICKS_CYCLE);
    }
    (ticks as u64) | KIND_LOCAL
}

/// Raw legacy timestamp as stored on disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegacyTimestamp(pub u64);

impl LegacyTimestamp {
    /// Encode a Unix time
    pub fn from_unix(unix_seconds: i64) -> Self {
        Self(to_legacy_ticks(unix_seconds))
    }

    /// Decode to Unix seconds
    pub fn to_unix(self) -> i64 {
        to_unix_seconds(self.0)
    }

    /// Raw on-disk value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LegacyTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match chrono::DateTime::from_timestamp(self.to_unix(), 0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "<invalid:{:#x}>", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_round_trip() {
        let encoded = to_legacy_ticks(0);
        assert_eq!(encoded, TICKS_TO_1970 as u64 | KIND_LOCAL);
        assert_eq!(to_unix_seconds(encoded), 0);
    }

    #[test]
    fn test_known_value() {
        // 2016-01-14 00:00:00 UTC
        let unix = 1_452_729_600;
        let encoded = LegacyTimestamp::from_unix(unix);
        assert_eq!(encoded.to_unix(), unix);
        assert_eq!(encoded.to_string(), "2016-01-14 00:00:00");
    }

    #[test]
    fn test_kind_bits_ignored_on_decode() {
        let ticks = (TICKS_TO_1970 + 42 * TICKS_PER_SECOND) as u64;
        assert_eq!(to_unix_seconds(ticks), 42);
        assert_eq!(to_unix_seconds(ticks | KIND_LOCAL), 42);
        assert_eq!(to_unix_seconds(ticks | 0x4000_0000_0000_0000), 42);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let ticks = (TICKS_TO_1970 + 42 * TICKS_PER_SECOND + TICKS_PER_SECOND - 1) as u64;
        assert_eq!(to_unix_seconds(ticks), 42);
    }

    #[test]
    fn test_ceiling_boundary() {
        assert_eq!(to_unix_seconds(to_legacy_ticks(MAX_UNIX_SECONDS)), MAX_UNIX_SECONDS);

        // One second past the ceiling wraps into the correction window
        let past = to_legacy_ticks(MAX_UNIX_SECONDS + 1);
        assert_ne!(to_unix_seconds(past), MAX_UNIX_SECONDS + 1);
    }

    #[test]
    fn test_ticks_just_above_ceiling_are_normalized() {
        let value = (TICKS_CEILING + 1) as u64;
        let expected = (TICKS_CEILING + 1 - TICKS_CYCLE + LOCAL_WRAP_CORRECTION - TICKS_TO_1970)
            / TICKS_PER_SECOND;
        assert_eq!(to_unix_seconds(value), expected);
    }

    proptest! {
        #[test]
        fn test_round_trip(t in 0i64..=MAX_UNIX_SECONDS) {
            prop_assert_eq!(to_unix_seconds(to_legacy_ticks(t)), t);
        }

        #[test]
        fn test_encoded_values_are_local(t in 0i64..=MAX_UNIX_SECONDS) {
            prop_assert!(to_legacy_ticks(t) & KIND_LOCAL != 0);
        }
    }
}
