//! STAMP packet layouts (RFC 8762, unauthenticated mode).
//!
//! The records are packed and big-endian. Each layout has a module of field
//! offsets relative to the start of the STAMP payload; [`stamp_offset`] turns
//! one into an absolute frame offset.

use crate::core::{
    REFLECTOR_PACKET_SIZE, SENDER_PACKET_SIZE, STAMP_PAYLOAD_OFFSET, TIMESTAMP_SIZE,
};

use super::timestamp::WireTimestamp;

/// Absolute frame offset of a STAMP payload field.
///
/// Adds the Ethernet, IPv4 and UDP header sizes to `field_offset`. Does no
/// bounds checking; callers check the result against the frame.
pub const fn stamp_offset(field_offset: usize) -> usize {
    STAMP_PAYLOAD_OFFSET + field_offset
}

/// Session-sender packet field offsets.
pub mod sender {
    /// Sequence number (4 bytes).
    pub const SEQ: usize = 0;
    /// Sender timestamp T1 (8 bytes).
    pub const TIMESTAMP: usize = 4;
    /// Error estimate (2 bytes).
    pub const ERROR_ESTIMATE: usize = 12;
    /// Must-be-zero padding (30 bytes).
    pub const MBZ: usize = 14;
    /// MBZ length.
    pub const MBZ_LEN: usize = 30;
}

/// Session-reflector packet field offsets.
pub mod reflector {
    /// Reflector sequence number (4 bytes).
    pub const SEQ: usize = 0;
    /// Transmit timestamp T3 (8 bytes).
    pub const TIMESTAMP: usize = 4;
    /// Reflector error estimate (2 bytes).
    pub const ERROR_ESTIMATE: usize = 12;
    /// MBZ (2 bytes).
    pub const MBZ1: usize = 14;
    /// Receive timestamp T2 (8 bytes).
    pub const RECEIVE_TIMESTAMP: usize = 16;
    /// Session-sender sequence number (4 bytes).
    pub const SENDER_SEQ: usize = 24;
    /// Session-sender timestamp T1 (8 bytes).
    pub const SENDER_TIMESTAMP: usize = 28;
    /// Session-sender error estimate (2 bytes).
    pub const SENDER_ERROR_ESTIMATE: usize = 36;
    /// MBZ (2 bytes).
    pub const MBZ2: usize = 38;
    /// Session-sender TTL (1 byte).
    pub const SENDER_TTL: usize = 40;
    /// MBZ (3 bytes).
    pub const MBZ3: usize = 41;
}

/// Session-sender test packet.
///
/// Wire format (44 bytes):
/// ```text
/// +----------+------------------+----------+----------------+
/// | Seq      | Timestamp (T1)   | Err Est  | MBZ            |
/// | 4 bytes  | 8 bytes          | 2 bytes  | 30 bytes       |
/// +----------+------------------+----------+----------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SenderPacket {
    /// Sequence number.
    pub seq: u32,
    /// Transmit timestamp T1.
    pub timestamp: WireTimestamp,
    /// Error estimate of T1.
    pub error_estimate: u16,
}

impl SenderPacket {
    /// Serialize (MBZ zeroed).
    pub fn to_bytes(&self) -> [u8; SENDER_PACKET_SIZE] {
        let mut buf = [0u8; SENDER_PACKET_SIZE];
        buf[sender::SEQ..sender::SEQ + 4].copy_from_slice(&self.seq.to_be_bytes());
        buf[sender::TIMESTAMP..sender::TIMESTAMP + TIMESTAMP_SIZE]
            .copy_from_slice(&self.timestamp.to_bytes());
        buf[sender::ERROR_ESTIMATE..sender::ERROR_ESTIMATE + 2]
            .copy_from_slice(&self.error_estimate.to_be_bytes());
        buf
    }

    /// Parse; MBZ content is ignored.
    pub fn from_bytes(bytes: &[u8; SENDER_PACKET_SIZE]) -> Self {
        Self {
            seq: read_u32(bytes, sender::SEQ),
            timestamp: read_timestamp(bytes, sender::TIMESTAMP),
            error_estimate: read_u16(bytes, sender::ERROR_ESTIMATE),
        }
    }
}

/// Session-reflector test packet.
///
/// Wire format (44 bytes):
/// ```text
/// +---------+---------------+---------+-----+---------------+
/// | Seq     | Timestamp T3  | Err Est | MBZ | Receive T2    |
/// | 4       | 8             | 2       | 2   | 8             |
/// +---------+---------------+---------+-----+---------------+
/// | S. Seq  | S. Timestamp  | S. Err  | MBZ | S. TTL | MBZ  |
/// | 4       | 8             | 2       | 2   | 1      | 3    |
/// +---------+---------------+---------+-----+--------+------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectorPacket {
    /// Reflector sequence number.
    pub seq: u32,
    /// Transmit timestamp T3.
    pub timestamp: WireTimestamp,
    /// Error estimate of the reflector clock.
    pub error_estimate: u16,
    /// Receive timestamp T2.
    pub receive_timestamp: WireTimestamp,
    /// Sequence number copied from the sender packet.
    pub sender_seq: u32,
    /// T1 copied from the sender packet.
    pub sender_timestamp: WireTimestamp,
    /// Error estimate copied from the sender packet.
    pub sender_error_estimate: u16,
    /// IP TTL of the received sender packet.
    pub sender_ttl: u8,
}

impl ReflectorPacket {
    /// Assemble a reply in stateless mode: the reflector sequence number
    /// echoes the sender's.
    pub fn reflect(
        request: &SenderPacket,
        receive_timestamp: WireTimestamp,
        timestamp: WireTimestamp,
        error_estimate: u16,
        sender_ttl: u8,
    ) -> Self {
        Self {
            seq: request.seq,
            timestamp,
            error_estimate,
            receive_timestamp,
            sender_seq: request.seq,
            sender_timestamp: request.timestamp,
            sender_error_estimate: request.error_estimate,
            sender_ttl,
        }
    }

    /// Serialize (MBZ zeroed).
    pub fn to_bytes(&self) -> [u8; REFLECTOR_PACKET_SIZE] {
        let mut buf = [0u8; REFLECTOR_PACKET_SIZE];
        buf[reflector::SEQ..reflector::SEQ + 4].copy_from_slice(&self.seq.to_be_bytes());
        buf[reflector::TIMESTAMP..reflector::TIMESTAMP + TIMESTAMP_SIZE]
            .copy_from_slice(&self.timestamp.to_bytes());
        buf[reflector::ERROR_ESTIMATE..reflector::ERROR_ESTIMATE + 2]
            .copy_from_slice(&self.error_estimate.to_be_bytes());
        buf[reflector::RECEIVE_TIMESTAMP..reflector::RECEIVE_TIMESTAMP + TIMESTAMP_SIZE]
            .copy_from_slice(&self.receive_timestamp.to_bytes());
        buf[reflector::SENDER_SEQ..reflector::SENDER_SEQ + 4]
            .copy_from_slice(&self.sender_seq.to_be_bytes());
        buf[reflector::SENDER_TIMESTAMP..reflector::SENDER_TIMESTAMP + TIMESTAMP_SIZE]
            .copy_from_slice(&self.sender_timestamp.to_bytes());
        buf[reflector::SENDER_ERROR_ESTIMATE..reflector::SENDER_ERROR_ESTIMATE + 2]
            .copy_from_slice(&self.sender_error_estimate.to_be_bytes());
        buf[reflector::SENDER_TTL] = self.sender_ttl;
        buf
    }

    /// Parse; MBZ content is ignored.
    pub fn from_bytes(bytes: &[u8; REFLECTOR_PACKET_SIZE]) -> Self {
        Self {
            seq: read_u32(bytes, reflector::SEQ),
            timestamp: read_timestamp(bytes, reflector::TIMESTAMP),
            error_estimate: read_u16(bytes, reflector::ERROR_ESTIMATE),
            receive_timestamp: read_timestamp(bytes, reflector::RECEIVE_TIMESTAMP),
            sender_seq: read_u32(bytes, reflector::SENDER_SEQ),
            sender_timestamp: read_timestamp(bytes, reflector::SENDER_TIMESTAMP),
            sender_error_estimate: read_u16(bytes, reflector::SENDER_ERROR_ESTIMATE),
            sender_ttl: bytes[reflector::SENDER_TTL],
        }
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_timestamp(bytes: &[u8], at: usize) -> WireTimestamp {
    WireTimestamp::new(read_u32(bytes, at), read_u32(bytes, at + 4))
}
