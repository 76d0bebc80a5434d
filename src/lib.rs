//! This crate exposes the internal functionality of the `portprobe` TCP
//! connect port prober.
//!
//! A scan takes one IPv4 target and one port specification (a single port,
//! `a-b` or `a,b`) and probes every port in the specification, one at a
//! time, in ascending order. Each probe opens a fresh TCP socket, attempts a
//! full connect and classifies the result:
//!
//! - **Open**: the handshake completed
//! - **Closed**: the connection was actively refused
//! - **Errored**: any other failure (unreachable, timed out...)
//!
//! ## Architecture Overview
//!
//! 1. **Input Processing**: [`port_spec::parse`] and
//!    [`address::TargetAddress::parse`] validate everything up front. Any
//!    failure here is a fatal [`error::ScanError`] and nothing is sent.
//! 2. **Network stack**: a [`session::NetworkSession`] owns the runtime
//!    for the whole scan and releases it when dropped.
//! 3. **Probing**: [`scanner::Prober`] performs one connection attempt
//!    through a [`scanner::transport::Transport`].
//! 4. **Driving**: [`scanner::Scanner`] walks the port list and prints one
//!    line per port.
//!
//! ## Basic Usage Example
//!
//! ```rust,no_run
//! use portprobe::address::TargetAddress;
//! use portprobe::port_spec;
//! use portprobe::scanner::{transport::TcpTransport, Prober, Scanner};
//! use portprobe::session::NetworkSession;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let target = TargetAddress::parse("127.0.0.1")?;
//!     let ports = port_spec::parse("1000-1020")?;
//!
//!     let session = NetworkSession::start()?;
//!     let prober = Prober::new(TcpTransport, Some(Duration::from_millis(500)));
//!     let mut scanner = Scanner::new(prober, target, ports, false, true);
//!
//!     let reports = session.block_on(scanner.run());
//!     println!("{} ports probed", reports.len());
//!     Ok(())
//! }
//! ```
#![allow(clippy::needless_doctest_main)]

pub mod tui;

pub mod error;

pub mod input;

pub mod port_spec;

pub mod address;

pub mod scanner;

pub mod session;

pub mod benchmark;
