//! Ethernet, IPv4 and UDP header field offsets.
//!
//! Offsets are absolute within the frame, assuming an untagged Ethernet II
//! header and an IPv4 header without options (the classifier rejects
//! anything else).
//!
//! ```text
//! 0        6        12   14                        34        42
//! +--------+--------+----+-------------------------+---------+--------
//! | dst    | src    | ET | IPv4 (20 bytes)         | UDP (8) | STAMP
//! +--------+--------+----+-------------------------+---------+--------
//! ```

use std::net::Ipv4Addr;

use crate::core::{ETH_HEADER_SIZE, FrameError, IPV4_HEADER_SIZE, MAC_ADDR_SIZE};

use super::frame::Frame;

/// Ethernet header field offsets.
pub mod eth {
    /// Destination MAC.
    pub const DEST: usize = 0;
    /// Source MAC.
    pub const SOURCE: usize = 6;
    /// EtherType.
    pub const PROTO: usize = 12;
}

/// IPv4 header field offsets.
pub mod ipv4 {
    use crate::core::ETH_HEADER_SIZE;

    /// Version (high nibble) and IHL (low nibble).
    pub const VERSION_IHL: usize = ETH_HEADER_SIZE;
    /// Total length (header + payload).
    pub const TOT_LEN: usize = ETH_HEADER_SIZE + 2;
    /// Flags and fragment offset.
    pub const FRAG_OFF: usize = ETH_HEADER_SIZE + 6;
    /// Time to live.
    pub const TTL: usize = ETH_HEADER_SIZE + 8;
    /// Protocol.
    pub const PROTOCOL: usize = ETH_HEADER_SIZE + 9;
    /// Header checksum.
    pub const CHECK: usize = ETH_HEADER_SIZE + 10;
    /// Source address.
    pub const SADDR: usize = ETH_HEADER_SIZE + 12;
    /// Destination address.
    pub const DADDR: usize = ETH_HEADER_SIZE + 16;

    /// Version 4, five 32-bit words.
    pub const VERSION_IHL_NO_OPTIONS: u8 = 0x45;
    /// More-fragments flag and offset bits (the DF bit is allowed).
    pub const FRAG_MASK: u16 = 0x3FFF;
}

/// UDP header field offsets.
pub mod udp {
    use crate::core::{ETH_HEADER_SIZE, IPV4_HEADER_SIZE};

    const BASE: usize = ETH_HEADER_SIZE + IPV4_HEADER_SIZE;

    /// Source port.
    pub const SOURCE: usize = BASE;
    /// Destination port.
    pub const DEST: usize = BASE + 2;
    /// Length (header + payload).
    pub const LEN: usize = BASE + 4;
    /// Checksum.
    pub const CHECK: usize = BASE + 6;
}

/// A hardware address.
pub type MacAddr = [u8; MAC_ADDR_SIZE];

/// Link- and network-layer addressing of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPair {
    /// Source MAC.
    pub src_mac: MacAddr,
    /// Destination MAC.
    pub dst_mac: MacAddr,
    /// Source IPv4 address.
    pub src_ip: Ipv4Addr,
    /// Destination IPv4 address.
    pub dst_ip: Ipv4Addr,
}

impl AddressPair {
    /// Read both address pairs from a frame.
    pub fn read(frame: &Frame<'_>) -> Result<Self, FrameError> {
        frame.ensure(ETH_HEADER_SIZE + IPV4_HEADER_SIZE)?;
        Ok(Self {
            src_mac: frame.load(eth::SOURCE)?,
            dst_mac: frame.load(eth::DEST)?,
            src_ip: Ipv4Addr::from(frame.load::<4>(ipv4::SADDR)?),
            dst_ip: Ipv4Addr::from(frame.load::<4>(ipv4::DADDR)?),
        })
    }

    /// The same pair with source and destination exchanged.
    pub fn reversed(self) -> Self {
        Self {
            src_mac: self.dst_mac,
            dst_mac: self.src_mac,
            src_ip: self.dst_ip,
            dst_ip: self.src_ip,
        }
    }
}
