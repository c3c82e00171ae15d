//! Reflector configuration.
//!
//! The host environment builds one [`ReflectorConfig`] and hands it to the
//! reflector; nothing on the per-frame path mutates it.

use std::net::Ipv4Addr;

use tracing::debug;

use crate::core::{ConfigError, MAX_EXTRA_PORTS, NANOS_PER_SEC, STAMP_PORT};
use crate::wire::ErrorEstimate;

/// UDP ports accepted as STAMP traffic.
///
/// Always contains the well-known port 862, plus up to
/// [`MAX_EXTRA_PORTS`] configured ports held in a fixed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortSet {
    extra: [u16; MAX_EXTRA_PORTS],
    count: usize,
}

impl PortSet {
    /// Only the well-known port.
    pub const fn well_known() -> Self {
        Self {
            extra: [0; MAX_EXTRA_PORTS],
            count: 0,
        }
    }

    /// Well-known port plus `ports`.
    ///
    /// Duplicates and 862 itself are folded away.
    pub fn with_ports(ports: &[u16]) -> Result<Self, ConfigError> {
        let mut set = Self::well_known();
        for &port in ports {
            set.insert(port)?;
        }
        Ok(set)
    }

    fn insert(&mut self, port: u16) -> Result<(), ConfigError> {
        if port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        if self.contains(port) {
            return Ok(());
        }
        if self.count == MAX_EXTRA_PORTS {
            return Err(ConfigError::TooManyPorts {
                count: self.count + 1,
                max: MAX_EXTRA_PORTS,
            });
        }
        self.extra[self.count] = port;
        self.count += 1;
        Ok(())
    }

    /// Whether `port` is accepted.
    #[inline]
    pub fn contains(&self, port: u16) -> bool {
        port == STAMP_PORT || self.extra[..self.count].contains(&port)
    }

    /// Whether either port of a UDP header is accepted.
    #[inline]
    pub fn matches(&self, source: u16, dest: u16) -> bool {
        self.contains(source) || self.contains(dest)
    }

    /// Configured ports beyond 862.
    pub fn extra(&self) -> &[u16] {
        &self.extra[..self.count]
    }
}

/// Reflector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectorConfig {
    /// Accepted UDP ports.
    pub ports: PortSet,

    /// Only reflect frames addressed to this IPv4 address.
    pub local_addr: Option<Ipv4Addr>,

    /// Seconds subtracted from every clock reading (TAI to UTC).
    pub clock_offset_secs: u64,

    /// Error estimate written into reflected packets.
    pub error_estimate: ErrorEstimate,
}

impl ReflectorConfig {
    /// Start building a configuration.
    pub fn builder() -> ReflectorConfigBuilder {
        ReflectorConfigBuilder::new()
    }

    /// Apply the clock offset to a raw reading.
    #[inline]
    pub fn adjust(&self, now_ns: u64) -> u64 {
        now_ns.saturating_sub(self.clock_offset_secs.saturating_mul(NANOS_PER_SEC))
    }
}

/// Builder for [`ReflectorConfig`].
#[derive(Debug, Default)]
pub struct ReflectorConfigBuilder {
    ports: Vec<u16>,
    local_addr: Option<Ipv4Addr>,
    clock_offset_secs: u64,
    synchronized: bool,
    scale: u8,
    multiplier: u8,
}

impl ReflectorConfigBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            multiplier: 1,
            ..Self::default()
        }
    }

    /// Accept an additional UDP port.
    pub fn port(mut self, port: u16) -> Self {
        self.ports.push(port);
        self
    }

    /// Accept additional UDP ports.
    pub fn ports(mut self, ports: impl IntoIterator<Item = u16>) -> Self {
        self.ports.extend(ports);
        self
    }

    /// Only reflect frames addressed to `addr`.
    pub fn local_addr(mut self, addr: Ipv4Addr) -> Self {
        self.local_addr = Some(addr);
        self
    }

    /// Subtract `secs` from clock readings (e.g. 37 for a TAI clock).
    pub fn clock_offset_secs(mut self, secs: u64) -> Self {
        self.clock_offset_secs = secs;
        self
    }

    /// Set the error estimate advertised in reflected packets.
    pub fn error_estimate(mut self, synchronized: bool, scale: u8, multiplier: u8) -> Self {
        self.synchronized = synchronized;
        self.scale = scale;
        self.multiplier = multiplier;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ReflectorConfig, ConfigError> {
        let ports = PortSet::with_ports(&self.ports)?;
        let error_estimate = ErrorEstimate::new(self.synchronized, self.scale, self.multiplier)?;

        let config = ReflectorConfig {
            ports,
            local_addr: self.local_addr,
            clock_offset_secs: self.clock_offset_secs,
            error_estimate,
        };
        debug!(
            extra_ports = ?config.ports.extra(),
            local_addr = ?config.local_addr,
            clock_offset_secs = config.clock_offset_secs,
            error_estimate = error_estimate.to_bits(),
            "reflector configured"
        );
        Ok(config)
    }
}
