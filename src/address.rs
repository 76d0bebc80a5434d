//! Validates the scan target.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use log::debug;

use crate::error::ScanError;

/// An IPv4 target whose port is swapped in before every probe.
///
/// The address is validated once per session; only the port changes
/// between probes.
///
/// ```rust
/// # use portprobe::address::TargetAddress;
/// let mut target = TargetAddress::parse("127.0.0.1").unwrap();
/// target.set_port(8080);
/// assert_eq!(target.socket_addr().to_string(), "127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetAddress {
    socket: SocketAddrV4,
}

impl TargetAddress {
    pub const fn new(ip: Ipv4Addr) -> Self {
        Self {
            socket: SocketAddrV4::new(ip, 0),
        }
    }

    /// Reads dotted-quad IPv4 text. Hostnames and IPv6 are rejected.
    pub fn parse(input: &str) -> Result<Self, ScanError> {
        let ip = Ipv4Addr::from_str(input.trim()).map_err(|_| ScanError::InvalidAddress {
            input: input.to_owned(),
        })?;
        debug!("Target address resolved to {ip}");
        Ok(Self::new(ip))
    }

    pub const fn ip(&self) -> &Ipv4Addr {
        self.socket.ip()
    }

    pub const fn port(&self) -> u16 {
        self.socket.port()
    }

    pub fn set_port(&mut self, port: u16) {
        self.socket.set_port(port);
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(self.socket)
    }
}

impl FromStr for TargetAddress {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip())
    }
}

#[cfg(test)]
mod tests {
    use super::TargetAddress;
    use crate::error::ScanError;
    use parameterized::parameterized;
    use std::net::Ipv4Addr;

    #[test]
    fn parse_loopback() {
        let target = TargetAddress::parse("127.0.0.1").unwrap();
        assert_eq!(target.ip(), &Ipv4Addr::LOCALHOST);
        assert_eq!(target.port(), 0);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let target = TargetAddress::parse(" 10.0.0.1\n").unwrap();
        assert_eq!(target.ip(), &Ipv4Addr::new(10, 0, 0, 1));
    }

    #[parameterized(input = {"", "localhost", "999.1.1.1", "1.2.3", "::1", "192.168.0.0/24", "1.2.3.4:80"})]
    fn parse_rejects(input: &str) {
        assert_eq!(
            TargetAddress::parse(input),
            Err(ScanError::InvalidAddress {
                input: input.to_owned()
            })
        );
    }

    #[test]
    fn port_is_replaced_not_accumulated() {
        let mut target = TargetAddress::new(Ipv4Addr::new(192, 168, 1, 1));
        target.set_port(22);
        target.set_port(443);
        assert_eq!(target.socket_addr().to_string(), "192.168.1.1:443");
        assert_eq!(target.to_string(), "192.168.1.1");
    }
}
