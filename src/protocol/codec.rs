//! Protocol codec
//!
//! Framing for requests and responses.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │   UTF-8 JSON document       │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! `Len` is the unsigned big-endian byte count of the payload, so a single
//! message carries at most 65535 bytes. Each connection exchanges exactly
//! one request frame and one response frame.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{JsonDbError, Result};

use super::{Request, Response};

/// Size of the length prefix in bytes
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest payload a frame can carry
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// Encode a message as a length-prefixed frame
pub fn encode_frame(message: &str) -> Result<Bytes> {
    let payload = message.as_bytes();
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(JsonDbError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    frame.put_u16(payload.len() as u16);
    frame.put_slice(payload);

    Ok(frame.freeze())
}

/// Decode a complete frame held in memory
///
/// Trailing bytes after the declared payload are rejected.
pub fn decode_frame(bytes: &[u8]) -> Result<String> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(JsonDbError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            LENGTH_PREFIX_SIZE,
            bytes.len()
        )));
    }

    let payload_len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    let payload = &bytes[LENGTH_PREFIX_SIZE..];

    if payload.len() != payload_len {
        return Err(JsonDbError::Protocol(format!(
            "Frame length mismatch: header says {} bytes, got {}",
            payload_len,
            payload.len()
        )));
    }

    payload_to_string(payload.to_vec())
}

fn payload_to_string(payload: Vec<u8>) -> Result<String> {
    String::from_utf8(payload)
        .map_err(|e| JsonDbError::Protocol(format!("Payload is not valid UTF-8: {}", e)))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one frame from a stream
///
/// Blocks until the whole payload has arrived or an error occurs
pub fn read_frame<R: Read>(reader: &mut R) -> Result<String> {
    let mut header = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u16::from_be_bytes(header) as usize;

    let mut payload = vec![0u8; payload_len];
    if payload_len > 0 {
        reader.read_exact(&mut payload)?;
    }

    payload_to_string(payload)
}

/// Write one frame to a stream and flush it
pub fn write_frame<W: Write>(writer: &mut W, message: &str) -> Result<()> {
    let frame = encode_frame(message)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Serialize and send a request
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    write_frame(writer, &request.to_json()?)
}

/// Read and deserialize a response
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    Response::from_json(&read_frame(reader)?)
}

/// Serialize and send a response
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_frame(writer, &response.to_json()?)
}
