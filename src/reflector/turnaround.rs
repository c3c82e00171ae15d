//! Header turnaround: send a frame back where it came from.
//!
//! Swapping source and destination leaves both the IPv4 header checksum and
//! the UDP checksum valid, because a one's-complement sum does not depend on
//! word order.

use crate::core::{
    ETH_HEADER_SIZE, FrameError, IPV4_ADDR_SIZE, IPV4_HEADER_SIZE, MAC_ADDR_SIZE, UDP_HEADER_SIZE,
};
use crate::wire::Frame;
use crate::wire::headers::{eth, ipv4, udp};

/// What the hook should do with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Forward unmodified through the normal path.
    Pass,
    /// Transmit the (mutated) frame out of this interface.
    Redirect(u32),
}

/// Swap link and network addresses, then redirect out the ingress interface.
///
/// Ports are left alone; see [`swap_ports`]. A frame too short for the
/// headers passes through untouched.
pub fn turnaround(frame: &mut Frame<'_>) -> Disposition {
    match swap_addresses(frame) {
        Ok(()) => Disposition::Redirect(frame.ifindex()),
        Err(_) => Disposition::Pass,
    }
}

fn swap_addresses(frame: &mut Frame<'_>) -> Result<(), FrameError> {
    frame.ensure(ETH_HEADER_SIZE + IPV4_HEADER_SIZE)?;
    let saddr = frame.load::<IPV4_ADDR_SIZE>(ipv4::SADDR)?;
    let daddr = frame.load::<IPV4_ADDR_SIZE>(ipv4::DADDR)?;
    frame.store(ipv4::SADDR, &daddr)?;
    frame.store(ipv4::DADDR, &saddr)?;

    frame.ensure(ETH_HEADER_SIZE)?;
    // Read both before writing either
    let src_mac = frame.load::<MAC_ADDR_SIZE>(eth::SOURCE)?;
    let dst_mac = frame.load::<MAC_ADDR_SIZE>(eth::DEST)?;
    frame.store(eth::SOURCE, &dst_mac)?;
    frame.store(eth::DEST, &src_mac)?;
    Ok(())
}

/// Swap UDP source and destination ports when they differ.
///
/// Returns whether the ports were swapped. Symmetric 862 ↔ 862 traffic is
/// left as is.
pub fn swap_ports(frame: &mut Frame<'_>) -> Result<bool, FrameError> {
    frame.ensure(ETH_HEADER_SIZE + IPV4_HEADER_SIZE + UDP_HEADER_SIZE)?;
    let source = frame.load_be16(udp::SOURCE)?;
    let dest = frame.load_be16(udp::DEST)?;
    if source == dest {
        return Ok(false);
    }
    frame.store_be16(udp::SOURCE, dest)?;
    frame.store_be16(udp::DEST, source)?;
    Ok(true)
}
