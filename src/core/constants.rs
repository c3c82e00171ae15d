//! Protocol constants from RFC 8762 and the link/network headers it rides on.
//!
//! These values are fixed by the wire format and MUST NOT be changed.

// =============================================================================
// LINK LAYER (IEEE 802.3)
// =============================================================================

/// Ethernet II header size (dst MAC + src MAC + EtherType).
pub const ETH_HEADER_SIZE: usize = 14;

/// Hardware address size.
pub const MAC_ADDR_SIZE: usize = 6;

/// EtherType for IPv4.
pub const ETH_P_IP: u16 = 0x0800;

// =============================================================================
// NETWORK LAYER (RFC 791)
// =============================================================================

/// IPv4 header size without options (IHL = 5).
pub const IPV4_HEADER_SIZE: usize = 20;

/// IPv4 address size.
pub const IPV4_ADDR_SIZE: usize = 4;

/// IP protocol number for UDP.
pub const IPPROTO_UDP: u8 = 17;

// =============================================================================
// TRANSPORT LAYER (RFC 768)
// =============================================================================

/// UDP header size.
pub const UDP_HEADER_SIZE: usize = 8;

/// Well-known STAMP / TWAMP-Light port.
pub const STAMP_PORT: u16 = 862;

/// Maximum number of additional accepted ports.
///
/// Kept small and fixed so the port match is a bounded scan.
pub const MAX_EXTRA_PORTS: usize = 8;

// =============================================================================
// FRAME GEOMETRY
// =============================================================================

/// Offset of the STAMP payload within a frame.
pub const STAMP_PAYLOAD_OFFSET: usize = ETH_HEADER_SIZE + IPV4_HEADER_SIZE + UDP_HEADER_SIZE;

/// Unauthenticated session-sender packet size (RFC 8762 §4.2.1).
pub const SENDER_PACKET_SIZE: usize = 44;

/// Unauthenticated session-reflector packet size (RFC 8762 §4.3.1).
pub const REFLECTOR_PACKET_SIZE: usize = 44;

// =============================================================================
// TIMESTAMPS (RFC 5905 §6, RFC 8762 §4.2.1)
// =============================================================================

/// Seconds between 1900-01-01 (NTP epoch) and 1970-01-01 (Unix epoch).
pub const NTP_UNIX_OFFSET_SECS: u64 = 2_208_988_800;

/// Nanoseconds per second.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Picoseconds represented by one unit of the fraction field.
pub const FRACTION_UNIT_PICOS: u64 = 232;

/// Largest sub-second remainder whose fraction count fits in 32 bits.
///
/// Remainders above this saturate the fraction field at `u32::MAX`.
pub const MAX_FRACTION_NANOS: u64 = 996_432_412;

/// Wire timestamp size (seconds + fraction).
pub const TIMESTAMP_SIZE: usize = 8;

/// TTL reported when the receive path cannot observe the IP header.
pub const TTL_UNKNOWN: u8 = 255;
