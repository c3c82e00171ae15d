//! In-place stamping: turn a sender packet into a reflector packet.
//!
//! The reflector packet overwrites the first 44 payload bytes. Any bytes a
//! larger sender packet carried past that are left alone, so the reply has
//! the same size as the request.

use crate::core::{
    ETH_HEADER_SIZE, FrameError, IPV4_HEADER_SIZE, REFLECTOR_PACKET_SIZE, SENDER_PACKET_SIZE,
    UDP_HEADER_SIZE,
};
use crate::wire::headers::{ipv4, udp};
use crate::wire::{ErrorEstimate, Frame, ReflectorPacket, SenderPacket, WireTimestamp, stamp_offset};

/// Check that the frame carries a whole sender packet inside its datagram.
///
/// The frame must hold the payload, the UDP length must cover it, and the
/// IPv4 total length must cover the UDP datagram and fit in the frame.
/// Link-layer padding past the datagram never counts as payload.
pub fn ensure_payload(frame: &Frame<'_>) -> Result<(), FrameError> {
    frame.ensure(stamp_offset(SENDER_PACKET_SIZE))?;

    let udp_len = usize::from(frame.load_be16(udp::LEN)?);
    if udp_len < UDP_HEADER_SIZE + SENDER_PACKET_SIZE {
        return Err(FrameError::Truncated {
            needed: UDP_HEADER_SIZE + SENDER_PACKET_SIZE,
            len: udp_len,
        });
    }

    let total_len = usize::from(frame.load_be16(ipv4::TOT_LEN)?);
    if total_len < IPV4_HEADER_SIZE + udp_len {
        return Err(FrameError::Truncated {
            needed: IPV4_HEADER_SIZE + udp_len,
            len: total_len,
        });
    }
    frame.ensure(ETH_HEADER_SIZE + total_len)
}

/// Rewrite the STAMP payload of `frame` as a reflector packet.
///
/// `rx` is the receive timestamp (T2), `tx` the transmit timestamp (T3).
/// The sender TTL is taken from the IPv4 header. A non-zero UDP checksum is
/// updated incrementally; zero means "no checksum" and stays zero.
///
/// Fails without touching the frame unless [`ensure_payload`] holds.
pub fn stamp(
    frame: &mut Frame<'_>,
    rx: WireTimestamp,
    tx: WireTimestamp,
    estimate: ErrorEstimate,
) -> Result<(), FrameError> {
    ensure_payload(frame)?;

    let request = frame.load::<SENDER_PACKET_SIZE>(stamp_offset(0))?;
    let ttl = frame.load_u8(ipv4::TTL)?;
    let reply = ReflectorPacket::reflect(
        &SenderPacket::from_bytes(&request),
        rx,
        tx,
        estimate.to_bits(),
        ttl,
    )
    .to_bytes();

    let check = frame.load_be16(udp::CHECK)?;
    frame.store(stamp_offset(0), &reply)?;
    if check != 0 {
        frame.store_be16(udp::CHECK, rewrite_checksum(check, &request, &reply))?;
    }
    Ok(())
}

/// Fold a payload rewrite into an existing UDP checksum.
///
/// The payload starts at an even offset from the UDP header, so the 16-bit
/// words line up with the ones the sender summed.
fn rewrite_checksum(
    check: u16,
    old: &[u8; SENDER_PACKET_SIZE],
    new: &[u8; REFLECTOR_PACKET_SIZE],
) -> u16 {
    let mut check = check;
    for (old, new) in old.chunks_exact(2).zip(new.chunks_exact(2)) {
        update_checksum(
            &mut check,
            u16::from_be_bytes([old[0], old[1]]),
            u16::from_be_bytes([new[0], new[1]]),
        );
    }
    // 0 is reserved for "no checksum"
    if check == 0 { 0xFFFF } else { check }
}

/// RFC 1624 eqn. 3: `HC' = ~(~HC + ~m + m')`.
#[inline]
fn update_checksum(checksum: &mut u16, old: u16, new: u16) {
    let mut sum = u32::from(!*checksum) + u32::from(!old) + u32::from(new);
    sum = (sum & 0xFFFF) + (sum >> 16);
    sum = (sum & 0xFFFF) + (sum >> 16);
    *checksum = !(sum as u16);
}
