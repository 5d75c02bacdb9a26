//! Client
//!
//! Sends requests to a JsonDB server. Every request opens its own
//! connection, matching the server's one-exchange-per-connection protocol.

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::Result;
use crate::protocol::{read_frame, write_frame, Request, Response};

/// Blocking client for a single server address
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: None,
        }
    }

    /// Apply a read/write timeout to every connection
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send `request` verbatim and return the raw response document
    pub fn send_raw(&self, request: &str) -> Result<String> {
        let stream = TcpStream::connect(&self.addr)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        let mut writer = BufWriter::new(stream.try_clone()?);
        let mut reader = BufReader::new(stream);

        write_frame(&mut writer, request)?;
        read_frame(&mut reader)
    }

    /// Send a typed request and decode the response
    pub fn send(&self, request: &Request) -> Result<Response> {
        let raw = self.send_raw(&request.to_json()?)?;
        Response::from_json(&raw)
    }
}
