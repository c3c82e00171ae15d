//! End-to-end reflection of raw Ethernet frames.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use stamp_reflector::core::{NANOS_PER_SEC, REFLECTOR_PACKET_SIZE, SENDER_PACKET_SIZE};
use stamp_reflector::prelude::*;
use stamp_reflector::reflector::turnaround;
use stamp_reflector::wire::headers::{ipv4, udp};
use stamp_reflector::wire::stamp_offset;

const MAC_A: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0A];
const MAC_B: [u8; 6] = [0x02, 0, 0, 0, 0, 0x0B];

/// MAC A -> B, 10.0.0.1 -> 10.0.0.2, UDP 862 -> 862, sender seq 7, TTL 64.
/// Both checksums are valid.
fn request_frame() -> Vec<u8> {
    hex::decode(concat!(
        // Ethernet
        "02000000000b", "02000000000a", "0800",
        // IPv4
        "4500", "0048", "1234", "4000", "40", "11", "146f", "0a000001", "0a000002",
        // UDP
        "035e", "035e", "0034", "52ed",
        // STAMP sender packet: seq, T1, error estimate, MBZ
        "00000007", "e8e8e8e8", "40000000", "8001",
        "000000000000000000000000000000000000000000000000000000000000",
    ))
    .unwrap()
}

fn ones_sum(words: impl Iterator<Item = u16>) -> u16 {
    let mut sum: u32 = words.map(u32::from).sum();
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

fn be_words(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes.chunks(2).map(|w| u16::from_be_bytes([w[0], w[1]]))
}

fn ipv4_checksum_ok(buf: &[u8]) -> bool {
    ones_sum(be_words(&buf[ipv4::VERSION_IHL..udp::SOURCE])) == 0xFFFF
}

fn udp_checksum_ok(buf: &[u8]) -> bool {
    let segment = &buf[udp::SOURCE..];
    let pseudo = [17u16, segment.len() as u16];
    let words = be_words(&buf[ipv4::SADDR..udp::SOURCE])
        .chain(pseudo)
        .chain(be_words(segment));
    ones_sum(words) == 0xFFFF
}

fn reflected(buf: &[u8]) -> ReflectorPacket {
    let payload = &buf[stamp_offset(0)..stamp_offset(REFLECTOR_PACKET_SIZE)];
    ReflectorPacket::from_bytes(payload.try_into().unwrap())
}

#[test]
fn test_fixture_is_valid() {
    let buf = request_frame();
    assert_eq!(buf.len(), stamp_offset(SENDER_PACKET_SIZE));
    assert!(ipv4_checksum_ok(&buf));
    assert!(udp_checksum_ok(&buf));
}

#[test]
fn test_bare_turnaround() {
    let mut buf = request_frame();
    let original = buf.clone();

    let disposition = turnaround(&mut Frame::new(&mut buf, 7));

    assert_eq!(disposition, Disposition::Redirect(7));
    assert_eq!(buf[0..6], MAC_A);
    assert_eq!(buf[6..12], MAC_B);
    assert_eq!(buf[ipv4::SADDR..ipv4::SADDR + 4], [10, 0, 0, 2]);
    assert_eq!(buf[ipv4::DADDR..ipv4::DADDR + 4], [10, 0, 0, 1]);
    // Ports and payload are not touched
    assert_eq!(buf[udp::SOURCE..], original[udp::SOURCE..]);
    assert!(ipv4_checksum_ok(&buf));
    assert!(udp_checksum_ok(&buf));
}

#[test]
fn test_process_end_to_end() {
    let t = 1_750_000_000 * NANOS_PER_SEC;
    let reflector = Reflector::new(ReflectorConfig::default(), ManualClock::new(t, 1_000));
    let mut buf = request_frame();

    let disposition = reflector.process(&mut Frame::new(&mut buf, 7));

    assert_eq!(disposition, Disposition::Redirect(7));
    assert_eq!(buf[0..6], MAC_A);
    assert_eq!(buf[6..12], MAC_B);
    assert_eq!(buf[ipv4::SADDR..ipv4::SADDR + 4], [10, 0, 0, 2]);
    assert_eq!(buf[ipv4::DADDR..ipv4::DADDR + 4], [10, 0, 0, 1]);
    assert_eq!(buf[udp::SOURCE..udp::SOURCE + 2], [0x03, 0x5E]);
    assert_eq!(buf[udp::DEST..udp::DEST + 2], [0x03, 0x5E]);
    // Address swap leaves the IPv4 header sum as is
    assert_eq!(buf[ipv4::CHECK..ipv4::CHECK + 2], [0x14, 0x6F]);

    let reply = reflected(&buf);
    assert_eq!(reply.seq, 7);
    assert_eq!(reply.sender_seq, 7);
    assert_eq!(reply.sender_timestamp, WireTimestamp::new(0xE8E8_E8E8, 0x4000_0000));
    assert_eq!(reply.sender_error_estimate, 0x8001);
    assert_eq!(reply.sender_ttl, 64);
    assert_eq!(reply.error_estimate, ErrorEstimate::default().to_bits());
    assert_eq!(reply.receive_timestamp, NtpCodec.encode(t));
    assert!(reply.receive_timestamp <= reply.timestamp);

    assert!(ipv4_checksum_ok(&buf));
    assert!(udp_checksum_ok(&buf));
}

#[test]
fn test_trailer_past_datagram_passes() {
    // Ethernet padding after a datagram that ends inside the payload
    let mut buf = request_frame();
    buf[ipv4::TOT_LEN..ipv4::TOT_LEN + 2].copy_from_slice(&48u16.to_be_bytes());
    buf[udp::LEN..udp::LEN + 2].copy_from_slice(&28u16.to_be_bytes());
    let before = buf.clone();

    let reflector = Reflector::new(ReflectorConfig::default(), ManualClock::new(0, 1));
    assert_eq!(
        reflector.process(&mut Frame::new(&mut buf, 1)),
        Disposition::Pass
    );
    assert_eq!(buf, before);
}

#[test]
fn test_reflect_then_measure() {
    let t1 = 1_750_000_000 * NANOS_PER_SEC;
    let sender = SenderPacket {
        seq: 99,
        timestamp: NtpCodec.encode(t1),
        error_estimate: ErrorEstimate::default().to_bits(),
    };
    let mut buf = request_frame();
    buf[stamp_offset(0)..].copy_from_slice(&sender.to_bytes());
    buf[udp::CHECK..udp::CHECK + 2].copy_from_slice(&[0, 0]);

    // Reflector sees the probe 2.32 ms later and spends 232 ns on it
    let clock = ManualClock::new(t1 + 2_320_000, 232);
    let reflector = Reflector::new(ReflectorConfig::default(), clock);
    assert!(matches!(
        reflector.process(&mut Frame::new(&mut buf, 1)),
        Disposition::Redirect(1)
    ));

    let t4 = NtpCodec.encode(t1 + 4_640_232);
    let m = Measurement::from_reflected(&reflected(&buf), t4);
    assert_eq!(m.seq, 99);
    assert_eq!(m.dwell_ns, 232);
    assert_eq!(m.forward_ns, 2_320_000);
    assert_eq!(m.backward_ns, 2_320_000);
    assert_eq!(m.round_trip_ns, 4_640_000);
}

#[test]
fn test_shared_across_threads() {
    let reflector = Arc::new(Reflector::new(
        ReflectorConfig::default(),
        MonotonicClock::new(),
    ));

    let handles: Vec<_> = (0..4u32)
        .map(|ifindex| {
            let reflector = Arc::clone(&reflector);
            thread::spawn(move || {
                let mut buf = request_frame();
                reflector.process(&mut Frame::new(&mut buf, ifindex))
            })
        })
        .collect();

    for (ifindex, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Disposition::Redirect(ifindex as u32));
    }
}

proptest! {
    #[test]
    fn prop_process_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..160)) {
        let reflector = Reflector::new(ReflectorConfig::default(), ManualClock::new(0, 1));
        let mut buf = bytes.clone();
        if reflector.process(&mut Frame::new(&mut buf, 1)) == Disposition::Pass {
            prop_assert_eq!(buf, bytes);
        }
    }

    #[test]
    fn prop_truncated_probe_passes(len in 0usize..86) {
        let reflector = Reflector::new(ReflectorConfig::default(), ManualClock::new(0, 1));
        let full = request_frame();
        let mut buf = full.clone();
        let disposition = reflector.process(&mut Frame::with_len(&mut buf, len, 1));
        prop_assert_eq!(disposition, Disposition::Pass);
        prop_assert_eq!(buf, full);
    }

    #[test]
    fn prop_turnaround_is_involution(
        macs in any::<[u8; 12]>(),
        addrs in any::<[u8; 8]>(),
    ) {
        let mut buf = request_frame();
        buf[..12].copy_from_slice(&macs);
        buf[ipv4::SADDR..ipv4::SADDR + 8].copy_from_slice(&addrs);
        let original = buf.clone();

        let mut frame = Frame::new(&mut buf, 3);
        turnaround(&mut frame);
        turnaround(&mut frame);
        prop_assert_eq!(buf, original);
    }
}
