//! Socket acquisition for probes.
//!
//! A [`Transport`] hands out one fresh [`ProbeSocket`] per probe. The
//! prober connects it once and then releases it, whatever the outcome.
use std::io;
use std::mem;
use std::net::SocketAddr;

use async_trait::async_trait;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpSocket, TcpStream};

/// Source of per-probe sockets.
pub trait Transport: Send + Sync {
    type Socket: ProbeSocket;

    /// Creates a new, unconnected socket suitable for reaching `target`.
    fn acquire(&self, target: &SocketAddr) -> io::Result<Self::Socket>;
}

/// A socket that is connected at most once and then released.
#[async_trait]
pub trait ProbeSocket: Send {
    async fn connect(&mut self, target: SocketAddr) -> io::Result<()>;

    /// Closes the socket. Must be called exactly once per acquired socket.
    async fn release(self);
}

/// Plain TCP connect sockets from tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpTransport;

impl Transport for TcpTransport {
    type Socket = TcpProbeSocket;

    fn acquire(&self, target: &SocketAddr) -> io::Result<Self::Socket> {
        let socket = match target {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        Ok(TcpProbeSocket {
            state: SocketState::Idle(socket),
        })
    }
}

#[derive(Debug)]
enum SocketState {
    Idle(TcpSocket),
    Connected(TcpStream),
    Spent,
}

#[derive(Debug)]
pub struct TcpProbeSocket {
    state: SocketState,
}

#[async_trait]
impl ProbeSocket for TcpProbeSocket {
    async fn connect(&mut self, target: SocketAddr) -> io::Result<()> {
        match mem::replace(&mut self.state, SocketState::Spent) {
            SocketState::Idle(socket) => {
                let stream = socket.connect(target).await?;
                self.state = SocketState::Connected(stream);
                Ok(())
            }
            SocketState::Connected(_) | SocketState::Spent => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "probe socket was already used",
            )),
        }
    }

    async fn release(self) {
        if let SocketState::Connected(mut stream) = self.state {
            debug!("Connection was successful, shutting down stream");
            if let Err(e) = stream.shutdown().await {
                debug!("Shutdown stream error {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProbeSocket, TcpTransport, Transport};
    use std::io;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_loopback_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut socket = TcpTransport.acquire(&addr).unwrap();
        socket.connect(addr).await.unwrap();
        socket.release().await;
    }

    #[tokio::test]
    async fn socket_cannot_be_reused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut socket = TcpTransport.acquire(&addr).unwrap();
        socket.connect(addr).await.unwrap();
        let err = socket.connect(addr).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        socket.release().await;
    }

    #[tokio::test]
    async fn connects_to_ipv6_loopback_listener() {
        // hosts without an IPv6 loopback have nothing to connect to
        let Ok(listener) = TcpListener::bind("[::1]:0").await else {
            return;
        };
        let addr = listener.local_addr().unwrap();
        assert!(addr.is_ipv6());

        let mut socket = TcpTransport.acquire(&addr).unwrap();
        socket.connect(addr).await.unwrap();
        socket.release().await;
    }
}
