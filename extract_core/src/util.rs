//! Common time/period helpers for extract_core.

use std::time::Duration;

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Frame period for a given frame rate.
/// - Clamps `fps` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn frame_period(fps: u32) -> Duration {
    Duration::from_micros((MICROS_PER_SEC / u64::from(fps.max(1))).max(1))
}

/// Convert configured seconds to a Duration; non-finite or negative input maps to zero.
#[inline]
pub fn secs_to_duration(secs: f32) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f32(secs).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
