//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.
//!
//! ## Lifecycle
//! ```text
//!   Running ──(exit command / ShutdownHandle::trigger)──▶ Stopped
//! ```
//! The acceptor thread owns the listener. Shutdown flips an atomic flag
//! and opens a throwaway loopback connection so a blocked `accept` returns;
//! the acceptor then sees the flag, leaves the loop and drops the listener.
//! Only the caller that wins the flag's compare-exchange sends the wake-up,
//! so concurrent exits close the listener exactly once.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;

use super::{Connection, WorkerPool};

const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// TCP server for JsonDB
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    local_addr: SocketAddr,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Bind the listener described by `config`
    ///
    /// Failing to bind is the one error that is fatal to the server.
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            engine,
            listener,
            local_addr,
            shutdown: ShutdownHandle::new(local_addr),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that can stop the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Serve connections until shutdown (blocking)
    ///
    /// Returns once the listener is closed and every queued connection has
    /// been answered.
    pub fn run(self) -> Result<()> {
        let Server {
            config,
            engine,
            listener,
            local_addr,
            shutdown,
        } = self;

        let pool = WorkerPool::new(config.worker_threads)?;
        tracing::info!(
            "Listening on {} with {} workers",
            local_addr,
            pool.size()
        );

        for stream in listener.incoming() {
            if shutdown.is_triggered() {
                tracing::debug!("Shutdown in progress, no longer accepting connections");
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let engine = Arc::clone(&engine);
            let shutdown = shutdown.clone();
            let (read_ms, write_ms) = (config.read_timeout_ms, config.write_timeout_ms);

            if let Err(e) =
                pool.execute(move || serve_connection(stream, engine, shutdown, read_ms, write_ms))
            {
                tracing::error!("Failed to dispatch connection: {}", e);
                break;
            }
        }

        drop(listener);
        tracing::info!("Listener on {} closed, draining workers", local_addr);

        pool.join();
        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Worker job for one accepted connection
fn serve_connection(
    stream: TcpStream,
    engine: Arc<Engine>,
    shutdown: ShutdownHandle,
    read_ms: u64,
    write_ms: u64,
) {
    let mut connection = match Connection::new(stream, engine) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::warn!("Failed to set up connection: {}", e);
            return;
        }
    };

    if let Err(e) = connection.set_timeouts(read_ms, write_ms) {
        tracing::warn!("Failed to set timeouts for {}: {}", connection.peer_addr(), e);
    }

    match connection.handle() {
        Ok(true) => {}
        Ok(false) => {
            if shutdown.trigger() {
                tracing::info!("Shutdown requested by {}", connection.peer_addr());
            }
        }
        Err(e) => tracing::warn!("Connection {} failed: {}", connection.peer_addr(), e),
    }
}

/// Cloneable trigger for stopping a [`Server`]
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    inner: Arc<ShutdownState>,
}

#[derive(Debug)]
struct ShutdownState {
    triggered: AtomicBool,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    fn new(listen_addr: SocketAddr) -> Self {
        Self {
            inner: Arc::new(ShutdownState {
                triggered: AtomicBool::new(false),
                wake_addr: connectable(listen_addr),
            }),
        }
    }

    /// Request shutdown
    ///
    /// Returns `true` for the single call that performed the transition,
    /// `false` if the server was already stopping.
    pub fn trigger(&self) -> bool {
        if self
            .inner
            .triggered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        // Unblock the acceptor; if this fails the listener is already gone
        if let Err(e) = TcpStream::connect_timeout(&self.inner.wake_addr, WAKE_TIMEOUT) {
            tracing::debug!("Wake-up connection to {} failed: {}", self.inner.wake_addr, e);
        }

        true
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::Acquire)
    }
}

/// A wildcard bind address is not connectable everywhere; use loopback
fn connectable(addr: SocketAddr) -> SocketAddr {
    match addr {
        SocketAddr::V4(v4) if v4.ip().is_unspecified() => {
            SocketAddr::from((Ipv4Addr::LOCALHOST, v4.port()))
        }
        SocketAddr::V6(v6) if v6.ip().is_unspecified() => {
            SocketAddr::from((Ipv6Addr::LOCALHOST, v6.port()))
        }
        other => other,
    }
}
