//! Wire layer: bounds-checked frames, header offsets, timestamps and STAMP
//! packet layouts.
//!
//! Everything here is pure and allocation-free. The reflector reads and
//! writes packets only through [`Frame`], so every access is checked against
//! the frame's validated length.

mod frame;
pub mod headers;
pub mod layout;
pub mod timestamp;

pub use frame::Frame;
pub use headers::{AddressPair, MacAddr};
pub use layout::{ReflectorPacket, SenderPacket, stamp_offset};
pub use timestamp::{ErrorEstimate, NtpCodec, UnixCodec, WireTimestamp};
