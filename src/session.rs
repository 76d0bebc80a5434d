//! Owns the network stack for the lifetime of a scan.
use std::future::Future;
use std::io;

use log::debug;
use tokio::runtime::{Builder, Runtime};

/// Process-wide network stack guard.
///
/// Built once before the first probe. Dropping it tears the stack down, so
/// every exit path out of the scope that owns it releases the stack,
/// including early returns on fatal errors.
///
/// The runtime is single threaded on purpose: probes run strictly one after
/// another on the calling thread.
#[derive(Debug)]
pub struct NetworkSession {
    runtime: Runtime,
}

impl NetworkSession {
    pub fn start() -> io::Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()?;
        debug!("Network stack initialised");
        Ok(Self { runtime })
    }

    /// Drives `future` to completion on the session's stack.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl Drop for NetworkSession {
    fn drop(&mut self) {
        debug!("Network stack released");
    }
}
