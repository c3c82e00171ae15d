//! # stamp-reflector
//!
//! Data plane of a **STAMP / TWAMP-Light** (RFC 8762) session-reflector.
//!
//! A packet hook hands every received frame to [`Reflector::process`]. Frames
//! that carry a STAMP probe are stamped with receive and transmit timestamps,
//! turned around and redirected out of the interface they arrived on; every
//! other frame passes through untouched.
//!
//! - **Bounded**: one straight pass per frame, no allocation, no panics
//! - **Checked**: every access goes through [`wire::Frame`] and its
//!   validated length
//! - **Stateless**: reflector sequence numbers echo the sender's
//!
//! ## Feature Flags
//!
//! - `socket` (default): [`socket::UdpReflector`], a tokio UDP reflector for
//!   hosts without a packet hook
//!
//! ## Modules
//!
//! - [`core`]: constants, error types and the `Clock`/`TimestampCodec` traits
//! - [`wire`]: frames, header offsets, timestamps and packet layouts
//! - [`reflector`]: classification, stamping, turnaround and configuration
//! - [`measure`]: sender-side delay arithmetic
//! - [`socket`]: user-space reflector (requires `socket` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use stamp_reflector::prelude::*;
//!
//! let config = ReflectorConfig::builder().port(4000).build().unwrap();
//! let reflector = Reflector::new(config, SystemClock);
//!
//! // An ARP frame is not ours
//! let mut buf = [0u8; 60];
//! buf[12..14].copy_from_slice(&[0x08, 0x06]);
//! let mut frame = Frame::new(&mut buf, 2);
//! assert_eq!(reflector.process(&mut frame), Disposition::Pass);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

pub mod measure;
pub mod reflector;
pub mod wire;

// User-space reflector (feature-gated)
#[cfg(feature = "socket")]
#[cfg_attr(docsrs, doc(cfg(feature = "socket")))]
pub mod socket;

/// Prelude module for convenient imports.
pub mod prelude {
    // Core traits and types
    pub use crate::core::{Clock, ConfigError, FrameError, Mismatch, StampError, TimestampCodec};

    pub use crate::measure::Measurement;
    pub use crate::reflector::{
        Disposition, ManualClock, MonotonicClock, Reflector, ReflectorConfig, SystemClock,
    };
    pub use crate::wire::{
        ErrorEstimate, Frame, NtpCodec, ReflectorPacket, SenderPacket, UnixCodec, WireTimestamp,
    };

    #[cfg(feature = "socket")]
    pub use crate::socket::UdpReflector;
}

// Re-export commonly used items at crate root
pub use crate::core::{FrameError, StampError};
pub use reflector::{Disposition, Reflector, ReflectorConfig};
pub use wire::Frame;
