//! Connection Handler
//!
//! Handles individual client connections: one request frame in, one
//! response frame out, then the connection is closed.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{Engine, REASON_INVALID_FORMAT, REASON_RESPONSE_TOO_LARGE};
use crate::error::{JsonDbError, Result};
use crate::protocol::{read_frame, write_response, Response};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the command engine
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves the socket blocking)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Serve the single request/response exchange
    ///
    /// Returns whether the server should keep serving. A response that
    /// cannot be delivered does not change that answer: an exit command
    /// stops the server even if its acknowledgement is lost.
    pub fn handle(&mut self) -> Result<bool> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        let raw = match read_frame(&mut self.reader) {
            Ok(raw) => raw,
            Err(JsonDbError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!("Client {} went away before sending a request", self.peer_addr);
                return Ok(true);
            }
            Err(JsonDbError::Io(ref e))
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                tracing::debug!("Read timeout for client {}", self.peer_addr);
                return Ok(true);
            }
            Err(e @ JsonDbError::Protocol(_)) => {
                tracing::warn!("Malformed frame from {}: {}", self.peer_addr, e);
                self.send_response(&Response::error(REASON_INVALID_FORMAT));
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        tracing::debug!("Received from {}: {}", self.peer_addr, raw);

        let outcome = self.engine.process(&raw);
        self.send_response(&outcome.response);

        Ok(outcome.keep_serving)
    }

    /// Send a response, logging rather than failing on a broken socket
    ///
    /// A response too large to frame is replaced by an error response, so
    /// the client still gets exactly one reply.
    fn send_response(&mut self, response: &Response) {
        let written = match write_response(&mut self.writer, response) {
            Err(JsonDbError::Protocol(reason)) => {
                tracing::warn!("Response to {} cannot be framed: {}", self.peer_addr, reason);
                write_response(&mut self.writer, &Response::error(REASON_RESPONSE_TOO_LARGE))
            }
            other => other,
        };

        match written {
            Ok(()) => tracing::trace!("Sent response to {}", self.peer_addr),
            Err(JsonDbError::Io(ref e)) if is_disconnect(e.kind()) => {
                tracing::debug!(
                    "Client {} disconnected before response could be sent: {}",
                    self.peer_addr,
                    e
                );
            }
            Err(e) => tracing::warn!("Error writing to {}: {}", self.peer_addr, e),
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
