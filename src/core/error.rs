//! Error types for the STAMP reflector.
//!
//! Per-frame errors never escape the entry point: the pipeline turns every
//! [`FrameError`] into a pass-through with the frame left untouched.

use thiserror::Error;

/// Why a frame does not belong to this protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// EtherType is not IPv4.
    EtherType(u16),
    /// IPv4 header carries options or is not version 4.
    Ipv4Shape(u8),
    /// IPv4 packet is a fragment.
    Fragment,
    /// IP protocol is not UDP.
    Protocol(u8),
    /// Neither UDP port is accepted.
    Port {
        /// Source port (host order).
        source: u16,
        /// Destination port (host order).
        dest: u16,
    },
    /// Destination address is not the configured local address.
    Destination,
}

/// Errors raised while reading or writing a frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Access would run past the frame's validated length.
    #[error("frame truncated: need {needed} bytes, have {len}")]
    Truncated {
        /// End offset the access required.
        needed: usize,
        /// Validated frame length.
        len: usize,
    },

    /// Frame is well-formed but not a STAMP probe.
    #[error("not applicable: {0:?}")]
    NotApplicable(Mismatch),
}

/// Errors in reflector configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// More extra ports than the fixed table holds.
    #[error("too many ports: {count} given, at most {max} allowed")]
    TooManyPorts {
        /// Ports requested.
        count: usize,
        /// Table capacity.
        max: usize,
    },

    /// Port 0 cannot carry probes.
    #[error("port 0 is not a valid STAMP port")]
    ZeroPort,

    /// Error estimate scale does not fit in 6 bits.
    #[error("error estimate scale {0} exceeds 63")]
    ScaleOutOfRange(u8),
}

/// Top-level errors.
#[derive(Debug, Error)]
pub enum StampError {
    /// Frame error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
