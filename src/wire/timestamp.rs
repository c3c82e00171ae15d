//! STAMP wire timestamps and the codecs that produce them.
//!
//! Wire format (8 bytes):
//! ```text
//! +------------------+------------------+
//! | Seconds          | Fraction         |
//! | 4 bytes (BE32)   | 4 bytes (BE32)   |
//! +------------------+------------------+
//! ```
//!
//! [`NtpCodec`] is the protocol timestamp: seconds since 1900 and a fraction
//! counted in 232 ps units. [`UnixCodec`] is a simplified variant that puts
//! seconds and nanoseconds of the raw clock reading on the wire unchanged;
//! it only interoperates with senders that use the same convention.

use crate::core::{
    ConfigError, FRACTION_UNIT_PICOS, NANOS_PER_SEC, NTP_UNIX_OFFSET_SECS, TIMESTAMP_SIZE,
    TimestampCodec,
};

/// A 64-bit fixed-point timestamp in host order.
///
/// Only [`to_bytes`](Self::to_bytes) and [`from_bytes`](Self::from_bytes)
/// touch network byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WireTimestamp {
    /// Whole seconds since the codec's epoch.
    pub seconds: u32,
    /// Sub-second fraction.
    pub fraction: u32,
}

impl WireTimestamp {
    /// Create a timestamp from its fields.
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    /// Serialize to network byte order.
    pub fn to_bytes(self) -> [u8; TIMESTAMP_SIZE] {
        let mut buf = [0u8; TIMESTAMP_SIZE];
        buf[0..4].copy_from_slice(&self.seconds.to_be_bytes());
        buf[4..8].copy_from_slice(&self.fraction.to_be_bytes());
        buf
    }

    /// Parse from network byte order.
    pub fn from_bytes(bytes: [u8; TIMESTAMP_SIZE]) -> Self {
        Self {
            seconds: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            fraction: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

/// NTP-style codec with 232 ps fraction units.
///
/// `fraction = remainder_ns * 1000 / 232` approximates
/// `remainder_ns * 2^32 / 1e9` without shifting. A decode/encode round trip
/// loses less than one fraction unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NtpCodec;

impl TimestampCodec for NtpCodec {
    fn encode(&self, nanos: u64) -> WireTimestamp {
        let seconds = nanos / NANOS_PER_SEC + NTP_UNIX_OFFSET_SECS;
        let remainder = nanos % NANOS_PER_SEC;
        let fraction = remainder * 1000 / FRACTION_UNIT_PICOS;

        WireTimestamp {
            // Wraps at the 2036 era rollover, as the wire format does
            seconds: seconds as u32,
            fraction: u32::try_from(fraction).unwrap_or(u32::MAX),
        }
    }

    fn decode(&self, ts: WireTimestamp) -> u64 {
        let seconds = u64::from(ts.seconds).saturating_sub(NTP_UNIX_OFFSET_SECS);
        let nanos = u64::from(ts.fraction) * FRACTION_UNIT_PICOS / 1000;
        seconds * NANOS_PER_SEC + nanos
    }
}

/// Simplified codec: clock seconds and nanoseconds, no epoch shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnixCodec;

impl TimestampCodec for UnixCodec {
    fn encode(&self, nanos: u64) -> WireTimestamp {
        WireTimestamp {
            seconds: (nanos / NANOS_PER_SEC) as u32,
            fraction: (nanos % NANOS_PER_SEC) as u32,
        }
    }

    fn decode(&self, ts: WireTimestamp) -> u64 {
        u64::from(ts.seconds) * NANOS_PER_SEC + u64::from(ts.fraction)
    }
}

/// Timestamp error estimate (RFC 8762 §4.2.1, RFC 4656 §4.1.2).
///
/// ```text
///  0                   1
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |S|Z|   Scale   |   Multiplier  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The error is `multiplier * 2^(scale - 32)` seconds. `S` marks a clock
/// synchronized to UTC, `Z` a PTP-format timestamp (always clear here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorEstimate(u16);

impl ErrorEstimate {
    const SYNC_BIT: u16 = 0x8000;
    const PTP_BIT: u16 = 0x4000;
    const MAX_SCALE: u8 = 0x3F;

    /// Build an estimate for an NTP-format timestamp.
    ///
    /// A zero multiplier is raised to 1, since zero would claim a perfect
    /// clock.
    pub fn new(synchronized: bool, scale: u8, multiplier: u8) -> Result<Self, ConfigError> {
        if scale > Self::MAX_SCALE {
            return Err(ConfigError::ScaleOutOfRange(scale));
        }
        let sync = if synchronized { Self::SYNC_BIT } else { 0 };
        let multiplier = multiplier.max(1);
        Ok(Self(sync | (u16::from(scale) << 8) | u16::from(multiplier)))
    }

    /// Wrap a raw wire value.
    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw wire value.
    pub fn to_bits(self) -> u16 {
        self.0
    }

    /// Whether the S bit is set.
    pub fn is_synchronized(self) -> bool {
        self.0 & Self::SYNC_BIT != 0
    }

    /// Whether the Z bit is set.
    pub fn is_ptp(self) -> bool {
        self.0 & Self::PTP_BIT != 0
    }

    /// Scale field.
    pub fn scale(self) -> u8 {
        ((self.0 >> 8) as u8) & Self::MAX_SCALE
    }

    /// Multiplier field.
    pub fn multiplier(self) -> u8 {
        self.0 as u8
    }

    /// Error bound in nanoseconds, saturating.
    pub fn as_nanos(self) -> u64 {
        let units = u128::from(self.multiplier()) << self.scale();
        let nanos = (units * u128::from(NANOS_PER_SEC)) >> 32;
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }
}

impl Default for ErrorEstimate {
    /// Unsynchronized, scale 0, multiplier 1.
    fn default() -> Self {
        Self(0x0001)
    }
}

/// Encode with the default [`NtpCodec`].
pub fn encode(nanos: u64) -> WireTimestamp {
    NtpCodec.encode(nanos)
}

/// Decode with the default [`NtpCodec`].
pub fn decode(ts: WireTimestamp) -> u64 {
    NtpCodec.decode(ts)
}
