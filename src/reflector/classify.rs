//! Frame classification: is this frame a STAMP probe?
//!
//! Runs before any mutation and fails closed. Each step checks the bytes it
//! is about to read; a frame too short for the next header is "not ours".

use crate::core::{
    ETH_HEADER_SIZE, ETH_P_IP, FrameError, IPPROTO_UDP, IPV4_HEADER_SIZE, Mismatch,
    UDP_HEADER_SIZE,
};
use crate::wire::Frame;
use crate::wire::headers::{eth, ipv4, udp};

use super::config::ReflectorConfig;

/// Outcome of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The frame is a candidate probe.
    Accept,
    /// The frame is not ours; forward it unmodified.
    Reject(FrameError),
}

impl Verdict {
    /// Whether the frame was accepted.
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Classify a frame against `config`.
pub fn classify(frame: &Frame<'_>, config: &ReflectorConfig) -> Verdict {
    match check(frame, config) {
        Ok(()) => Verdict::Accept,
        Err(err) => Verdict::Reject(err),
    }
}

fn check(frame: &Frame<'_>, config: &ReflectorConfig) -> Result<(), FrameError> {
    // Link layer
    let proto = frame.load_be16(eth::PROTO)?;
    if proto != ETH_P_IP {
        return Err(FrameError::NotApplicable(Mismatch::EtherType(proto)));
    }

    // Network layer: must precede every read past the Ethernet header
    frame.ensure(ETH_HEADER_SIZE + IPV4_HEADER_SIZE)?;
    let version_ihl = frame.load_u8(ipv4::VERSION_IHL)?;
    if version_ihl != ipv4::VERSION_IHL_NO_OPTIONS {
        return Err(FrameError::NotApplicable(Mismatch::Ipv4Shape(version_ihl)));
    }
    if frame.load_be16(ipv4::FRAG_OFF)? & ipv4::FRAG_MASK != 0 {
        return Err(FrameError::NotApplicable(Mismatch::Fragment));
    }
    let protocol = frame.load_u8(ipv4::PROTOCOL)?;
    if protocol != IPPROTO_UDP {
        return Err(FrameError::NotApplicable(Mismatch::Protocol(protocol)));
    }

    // Transport layer
    frame.ensure(ETH_HEADER_SIZE + IPV4_HEADER_SIZE + UDP_HEADER_SIZE)?;
    let source = frame.load_be16(udp::SOURCE)?;
    let dest = frame.load_be16(udp::DEST)?;
    if !config.ports.matches(source, dest) {
        return Err(FrameError::NotApplicable(Mismatch::Port { source, dest }));
    }

    if let Some(local) = config.local_addr
        && frame.load::<4>(ipv4::DADDR)? != local.octets()
    {
        return Err(FrameError::NotApplicable(Mismatch::Destination));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::STAMP_PORT;
    use std::net::Ipv4Addr;

    /// Ethernet + IPv4 + UDP headers to 10.0.0.2, no payload.
    fn udp_frame(source: u16, dest: u16) -> Vec<u8> {
        let mut buf = vec![0u8; 42];
        buf[eth::PROTO..eth::PROTO + 2].copy_from_slice(&ETH_P_IP.to_be_bytes());
        buf[ipv4::VERSION_IHL] = 0x45;
        buf[ipv4::PROTOCOL] = IPPROTO_UDP;
        buf[ipv4::DADDR..ipv4::DADDR + 4].copy_from_slice(&[10, 0, 0, 2]);
        buf[udp::SOURCE..udp::SOURCE + 2].copy_from_slice(&source.to_be_bytes());
        buf[udp::DEST..udp::DEST + 2].copy_from_slice(&dest.to_be_bytes());
        buf
    }

    fn verdict(buf: &mut [u8], config: &ReflectorConfig) -> Verdict {
        classify(&Frame::new(buf, 1), config)
    }

    #[test]
    fn test_accept_minimal_probe() {
        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        assert_eq!(verdict(&mut buf, &ReflectorConfig::default()), Verdict::Accept);
    }

    #[test]
    fn test_accept_either_port() {
        let config = ReflectorConfig::default();
        assert!(verdict(&mut udp_frame(40000, STAMP_PORT), &config).is_accept());
        assert!(verdict(&mut udp_frame(STAMP_PORT, 40000), &config).is_accept());
    }

    #[test]
    fn test_reject_wrong_port() {
        let mut buf = udp_frame(40000, 40001);
        assert_eq!(
            verdict(&mut buf, &ReflectorConfig::default()),
            Verdict::Reject(FrameError::NotApplicable(Mismatch::Port {
                source: 40000,
                dest: 40001
            }))
        );
    }

    #[test]
    fn test_accept_configured_port() {
        let config = ReflectorConfig::builder().port(40001).build().unwrap();
        assert!(verdict(&mut udp_frame(40000, 40001), &config).is_accept());
    }

    #[test]
    fn test_reject_non_ipv4() {
        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        buf[eth::PROTO..eth::PROTO + 2].copy_from_slice(&0x86DDu16.to_be_bytes());
        assert_eq!(
            verdict(&mut buf, &ReflectorConfig::default()),
            Verdict::Reject(FrameError::NotApplicable(Mismatch::EtherType(0x86DD)))
        );
    }

    #[test]
    fn test_reject_non_udp() {
        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        buf[ipv4::PROTOCOL] = 6;
        assert_eq!(
            verdict(&mut buf, &ReflectorConfig::default()),
            Verdict::Reject(FrameError::NotApplicable(Mismatch::Protocol(6)))
        );
    }

    #[test]
    fn test_reject_ip_options_and_fragments() {
        let config = ReflectorConfig::default();

        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        buf[ipv4::VERSION_IHL] = 0x46;
        assert!(!verdict(&mut buf, &config).is_accept());

        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        buf[ipv4::FRAG_OFF] = 0x20; // MF
        assert_eq!(
            verdict(&mut buf, &config),
            Verdict::Reject(FrameError::NotApplicable(Mismatch::Fragment))
        );

        // DF alone is fine
        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        buf[ipv4::FRAG_OFF] = 0x40;
        assert!(verdict(&mut buf, &config).is_accept());
    }

    #[test]
    fn test_reject_every_short_frame() {
        let config = ReflectorConfig::default();
        let full = udp_frame(STAMP_PORT, STAMP_PORT);
        for len in 0..full.len() {
            let mut buf = full.clone();
            let frame = Frame::with_len(&mut buf, len, 1);
            assert!(
                matches!(
                    classify(&frame, &config),
                    Verdict::Reject(FrameError::Truncated { .. })
                ),
                "length {len} accepted"
            );
        }
    }

    #[test]
    fn test_local_addr_filter() {
        let ours = ReflectorConfig::builder()
            .local_addr(Ipv4Addr::new(10, 0, 0, 2))
            .build()
            .unwrap();
        let theirs = ReflectorConfig::builder()
            .local_addr(Ipv4Addr::new(10, 0, 0, 9))
            .build()
            .unwrap();

        assert!(verdict(&mut udp_frame(STAMP_PORT, STAMP_PORT), &ours).is_accept());
        assert_eq!(
            verdict(&mut udp_frame(STAMP_PORT, STAMP_PORT), &theirs),
            Verdict::Reject(FrameError::NotApplicable(Mismatch::Destination))
        );
    }

    #[test]
    fn test_classify_does_not_mutate() {
        let mut buf = udp_frame(STAMP_PORT, STAMP_PORT);
        let before = buf.clone();
        let _ = verdict(&mut buf, &ReflectorConfig::default());
        assert_eq!(buf, before);
    }
}
