//! Core traits for the STAMP reflector.
//!
//! These are the seams the host environment plugs into: where time comes
//! from, and how a clock reading becomes a wire timestamp.

use crate::wire::WireTimestamp;

/// Source of nanosecond clock readings.
///
/// The reflector reads the clock twice per probe: once on receipt and once
/// just before the reflected packet is written.
///
/// # Requirements
///
/// - `now_ns` MUST be non-decreasing across calls on the same instance
/// - readings from the reflector and the session-sender should share a time
///   base for one-way delays to be meaningful; round-trip values do not
///   depend on it
pub trait Clock: Send + Sync {
    /// Current time in nanoseconds since the clock's reference point.
    fn now_ns(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ns(&self) -> u64 {
        (**self).now_ns()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_ns(&self) -> u64 {
        (**self).now_ns()
    }
}

/// Conversion between clock readings and wire timestamps.
///
/// # Example
///
/// ```
/// use stamp_reflector::prelude::*;
///
/// let ts = NtpCodec.encode(1_500_000_000);
/// assert_eq!(ts.seconds, 2_208_988_801);
/// assert!(NtpCodec.decode(ts).abs_diff(1_500_000_000) <= 232);
/// ```
pub trait TimestampCodec: Send + Sync {
    /// Encode a nanosecond clock reading.
    fn encode(&self, nanos: u64) -> WireTimestamp;

    /// Decode a wire timestamp back to nanoseconds.
    fn decode(&self, ts: WireTimestamp) -> u64;
}
