//! Core functionality for actual scanning behaviour.
use crate::address::TargetAddress;
use crate::port_spec::PortList;
use log::debug;

pub mod transport;
use transport::{ProbeSocket, Transport};

use colored::Colorize;
use std::{fmt, io, net::SocketAddr, time::Duration};
use thiserror::Error;
use tokio::time;

/// Result of a single connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The handshake completed.
    Open,
    /// The remote host actively refused the connection.
    Closed,
    /// Anything else: unreachable, timed out, out of sockets...
    Errored(ProbeFailure),
}

impl ProbeOutcome {
    fn from_connect(result: io::Result<()>) -> Self {
        match result {
            Ok(()) => Self::Open,
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => Self::Closed,
            Err(e) => Self::Errored(e.into()),
        }
    }

    /// Short lowercase name, used by greppable output.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Errored(_) => "error",
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Errored(failure) => write!(f, "ERROR: ({failure})"),
        }
    }
}

/// A connection failure other than refusal. Local to one port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ProbeFailure {
    kind: io::ErrorKind,
    reason: String,
}

impl ProbeFailure {
    pub const fn kind(&self) -> io::ErrorKind {
        self.kind
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<io::Error> for ProbeFailure {
    fn from(e: io::Error) -> Self {
        Self {
            kind: e.kind(),
            reason: e.to_string(),
        }
    }
}

/// What happened to one port, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortReport {
    pub port: u16,
    pub outcome: ProbeOutcome,
}

/// Performs exactly one connection attempt per call.
#[derive(Debug)]
pub struct Prober<T> {
    transport: T,
    timeout: Option<Duration>,
}

impl<T: Transport> Prober<T> {
    /// With `timeout` set to `None` a connect blocks for as long as the
    /// operating system lets it, which can be minutes against a host that
    /// silently drops SYNs.
    pub const fn new(transport: T, timeout: Option<Duration>) -> Self {
        Self { transport, timeout }
    }

    /// Probes `port` on `target`, leaving `target` pointed at `port`.
    ///
    /// Every socket acquired here is released before returning, on every
    /// path. A failure to even create the socket is reported as
    /// [`ProbeOutcome::Errored`].
    pub async fn probe(&self, target: &mut TargetAddress, port: u16) -> ProbeOutcome {
        target.set_port(port);
        let addr = target.socket_addr();

        let mut socket = match self.transport.acquire(&addr) {
            Ok(socket) => socket,
            Err(e) => {
                debug!("Socket creation failed for {addr}: {e}");
                return ProbeOutcome::Errored(e.into());
            }
        };

        let result = self.connect(&mut socket, addr).await;
        socket.release().await;

        if let Err(e) = &result {
            debug!("Connect to {addr} failed: {e}");
        }
        ProbeOutcome::from_connect(result)
    }

    async fn connect(&self, socket: &mut T::Socket, addr: SocketAddr) -> io::Result<()> {
        match self.timeout {
            Some(timeout) => time::timeout(timeout, socket.connect(addr)).await?,
            None => socket.connect(addr).await,
        }
    }
}

/// Walks a [`PortList`] in ascending order, one probe at a time.
///
/// greppable prints `port:state` lines only.
/// accessible turns off colours.
#[derive(Debug)]
pub struct Scanner<T> {
    prober: Prober<T>,
    target: TargetAddress,
    ports: PortList,
    greppable: bool,
    accessible: bool,
}

impl<T: Transport> Scanner<T> {
    pub const fn new(
        prober: Prober<T>,
        target: TargetAddress,
        ports: PortList,
        greppable: bool,
        accessible: bool,
    ) -> Self {
        Self {
            prober,
            target,
            ports,
            greppable,
            accessible,
        }
    }

    pub const fn ports(&self) -> &PortList {
        &self.ports
    }

    /// Probes every port and prints one line per port as soon as its probe
    /// finishes. Per-port failures never stop the scan.
    pub async fn run(&mut self) -> Vec<PortReport> {
        debug!(
            "Start scanning {} on {} ({} ports)",
            self.target,
            self.ports.scope(),
            self.ports.len()
        );

        let mut reports = Vec::with_capacity(self.ports.len());
        for port in self.ports.iter() {
            let outcome = self.prober.probe(&mut self.target, port).await;
            self.fmt_outcome(port, &outcome);
            reports.push(PortReport { port, outcome });
        }

        debug!(
            "Open ports found: {:?}",
            reports
                .iter()
                .filter(|report| report.outcome.is_open())
                .map(|report| report.port)
                .collect::<Vec<_>>()
        );
        reports
    }

    fn fmt_outcome(&self, port: u16, outcome: &ProbeOutcome) {
        if self.greppable {
            println!("{port}:{}", outcome.label());
        } else if self.accessible {
            println!("Port {port} : {outcome}");
        } else {
            let state = match outcome {
                ProbeOutcome::Open => outcome.to_string().green(),
                ProbeOutcome::Closed => outcome.to_string().red(),
                ProbeOutcome::Errored(_) => outcome.to_string().yellow(),
            };
            println!("Port {port} : {state}");
        }
    }
}
