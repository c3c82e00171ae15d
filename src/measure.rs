//! Sender-side delay arithmetic for reflected packets.
//!
//! A reflected packet carries T1 (sender transmit), T2 (reflector receive)
//! and T3 (reflector transmit); the sender adds T4 on receipt.

use std::time::Duration;

use crate::core::TimestampCodec;
use crate::wire::{NtpCodec, ReflectorPacket, WireTimestamp};

/// Delays derived from one reflected probe, in nanoseconds.
///
/// One-way values are only meaningful when sender and reflector clocks are
/// synchronized and may be negative otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Sequence number echoed by the reflector.
    pub seq: u32,
    /// `(T4 - T1) - (T3 - T2)`.
    pub round_trip_ns: i64,
    /// `T2 - T1`.
    pub forward_ns: i64,
    /// `T4 - T3`.
    pub backward_ns: i64,
    /// `T3 - T2`, time spent inside the reflector.
    pub dwell_ns: i64,
    /// IP TTL the sender packet arrived with.
    pub sender_ttl: u8,
}

impl Measurement {
    /// Measure a reflected packet received at `t4`, using NTP timestamps.
    pub fn from_reflected(reply: &ReflectorPacket, t4: WireTimestamp) -> Self {
        Self::from_reflected_with(&NtpCodec, reply, t4)
    }

    /// Measure with an explicit codec.
    pub fn from_reflected_with<T: TimestampCodec>(
        codec: &T,
        reply: &ReflectorPacket,
        t4: WireTimestamp,
    ) -> Self {
        let t1 = codec.decode(reply.sender_timestamp);
        let t2 = codec.decode(reply.receive_timestamp);
        let t3 = codec.decode(reply.timestamp);
        let t4 = codec.decode(t4);

        let dwell_ns = delta(t3, t2);
        Self {
            seq: reply.sender_seq,
            round_trip_ns: delta(t4, t1).saturating_sub(dwell_ns),
            forward_ns: delta(t2, t1),
            backward_ns: delta(t4, t3),
            dwell_ns,
            sender_ttl: reply.sender_ttl,
        }
    }

    /// Round-trip time, clamped at zero.
    pub fn round_trip(&self) -> Duration {
        Duration::from_nanos(u64::try_from(self.round_trip_ns).unwrap_or(0))
    }
}

fn delta(later: u64, earlier: u64) -> i64 {
    let diff = i128::from(later) - i128::from(earlier);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}
