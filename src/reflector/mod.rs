//! STAMP session-reflector data plane.
//!
//! [`Reflector::process`] is the per-frame entry point a packet hook calls:
//! classify, stamp, turn around. Every failure short-circuits to
//! [`Disposition::Pass`] before the frame has been modified.

mod classify;
mod clock;
mod config;
mod stamp;
mod turnaround;

pub use classify::{Verdict, classify};
pub use clock::{ManualClock, MonotonicClock, SystemClock};
pub use config::{PortSet, ReflectorConfig, ReflectorConfigBuilder};
pub use stamp::{ensure_payload, stamp};
pub use turnaround::{Disposition, swap_ports, turnaround};

use crate::core::{Clock, ETH_HEADER_SIZE, FrameError, IPV4_HEADER_SIZE, TimestampCodec};
use crate::wire::{Frame, NtpCodec, WireTimestamp};

/// Stateless STAMP session-reflector.
///
/// Holds only immutable configuration, a clock and a codec, so one instance
/// can be shared across threads that each process their own frames.
#[derive(Debug, Clone)]
pub struct Reflector<C: Clock, T: TimestampCodec = NtpCodec> {
    config: ReflectorConfig,
    clock: C,
    codec: T,
}

impl<C: Clock> Reflector<C> {
    /// Create a reflector using NTP timestamps.
    pub fn new(config: ReflectorConfig, clock: C) -> Self {
        Self::with_codec(config, clock, NtpCodec)
    }
}

impl<C: Clock, T: TimestampCodec> Reflector<C, T> {
    /// Create a reflector with an explicit timestamp codec.
    pub fn with_codec(config: ReflectorConfig, clock: C, codec: T) -> Self {
        Self {
            config,
            clock,
            codec,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReflectorConfig {
        &self.config
    }

    /// Clock used for T2 and T3.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current time as a wire timestamp, after the configured clock offset.
    pub fn timestamp(&self) -> WireTimestamp {
        self.codec.encode(self.config.adjust(self.clock.now_ns()))
    }

    /// Process one received frame.
    ///
    /// Returns [`Disposition::Redirect`] with the ingress interface when the
    /// frame was a STAMP probe and has been rewritten into a reply. Anything
    /// else returns [`Disposition::Pass`] and leaves the frame untouched.
    pub fn process(&self, frame: &mut Frame<'_>) -> Disposition {
        match self.reflect(frame) {
            Ok(ifindex) => Disposition::Redirect(ifindex),
            Err(_) => Disposition::Pass,
        }
    }

    fn reflect(&self, frame: &mut Frame<'_>) -> Result<u32, FrameError> {
        if let Verdict::Reject(err) = classify(frame, &self.config) {
            return Err(err);
        }
        let rx = self.timestamp();

        // Every later step stays inside this bound, so nothing below can
        // fail half way through a rewrite
        ensure_payload(frame)?;

        let tx = self.timestamp();
        stamp(frame, rx, tx, self.config.error_estimate)?;
        match turnaround(frame) {
            Disposition::Redirect(ifindex) => {
                swap_ports(frame)?;
                Ok(ifindex)
            }
            Disposition::Pass => Err(FrameError::Truncated {
                needed: ETH_HEADER_SIZE + IPV4_HEADER_SIZE,
                len: frame.len(),
            }),
        }
    }
}
