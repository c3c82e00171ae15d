//! User-space STAMP reflector over a tokio UDP socket.
//!
//! A fallback for hosts where no packet hook is available. The kernel
//! handles addressing, so only the STAMP payload is rewritten; the sender
//! TTL is not visible on a plain UDP socket and is reported as 255.

use std::io;
use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tracing::{debug, trace, warn};

use crate::core::{
    Clock, REFLECTOR_PACKET_SIZE, SENDER_PACKET_SIZE, StampError, TTL_UNKNOWN, TimestampCodec,
};
use crate::reflector::{Reflector, ReflectorConfig, SystemClock};
use crate::wire::{NtpCodec, ReflectorPacket, SenderPacket};

/// Receive buffer size; larger probes are truncated by the socket.
pub const RECV_BUFFER_SIZE: usize = 2048;

/// STAMP session-reflector bound to a UDP socket.
#[derive(Debug)]
pub struct UdpReflector<C: Clock = SystemClock, T: TimestampCodec = NtpCodec> {
    socket: UdpSocket,
    reflector: Reflector<C, T>,
    recv_buffer: Vec<u8>,
}

impl UdpReflector {
    /// Bind to `addr` and reflect with the system clock.
    pub async fn bind(addr: SocketAddr, config: ReflectorConfig) -> Result<Self, StampError> {
        let socket = UdpSocket::bind(addr).await?;
        let reflector = Self::from_socket(socket, Reflector::new(config, SystemClock));
        debug!(local_addr = ?reflector.local_addr().ok(), "STAMP reflector bound");
        Ok(reflector)
    }
}

impl<C: Clock, T: TimestampCodec> UdpReflector<C, T> {
    /// Wrap an already bound socket.
    pub fn from_socket(socket: UdpSocket, reflector: Reflector<C, T>) -> Self {
        Self {
            socket,
            reflector,
            recv_buffer: vec![0u8; RECV_BUFFER_SIZE],
        }
    }

    /// Local address of the socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// The reflector supplying timestamps and configuration.
    pub fn reflector(&self) -> &Reflector<C, T> {
        &self.reflector
    }

    /// Reflect probes until receiving fails.
    pub async fn run(&mut self) -> Result<(), StampError> {
        loop {
            self.reflect_once().await?;
        }
    }

    /// Receive one datagram and answer it.
    ///
    /// Returns the peer that was answered, or `None` when the datagram was
    /// too short to be a probe or the reply could not be sent. Only receive
    /// errors are returned as `Err`.
    pub async fn reflect_once(&mut self) -> Result<Option<SocketAddr>, StampError> {
        let (len, peer) = self.socket.recv_from(&mut self.recv_buffer).await?;
        let rx = self.reflector.timestamp();

        let datagram = &mut self.recv_buffer[..len];
        let Some(request) = datagram.first_chunk::<SENDER_PACKET_SIZE>() else {
            trace!(%peer, len, "dropping short datagram");
            return Ok(None);
        };
        let request = SenderPacket::from_bytes(request);

        let tx = self.reflector.timestamp();
        let reply = ReflectorPacket::reflect(
            &request,
            rx,
            tx,
            self.reflector.config().error_estimate.to_bits(),
            TTL_UNKNOWN,
        );
        // Trailing bytes of a larger probe are echoed back unchanged
        datagram[..REFLECTOR_PACKET_SIZE].copy_from_slice(&reply.to_bytes());

        match self.socket.send_to(datagram, peer).await {
            Ok(_) => {
                trace!(%peer, seq = request.seq, len, "reflected probe");
                Ok(Some(peer))
            }
            Err(err) => {
                warn!(%peer, error = %err, "failed to send reflected probe");
                Ok(None)
            }
        }
    }
}
