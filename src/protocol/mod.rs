//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │   UTF-8 JSON document       │
//! └──────────┴─────────────────────────────┘
//! ```
//!
//! ### Request
//! ```text
//! { "type": "get" | "set" | "delete" | "exit",
//!   "key":  "name" | ["path", "to", "field"],
//!   "value": <any JSON> }
//! ```
//!
//! ### Response
//! ```text
//! { "response": "OK" | "ERROR",
//!   "value":  <any JSON>,   (successful get only)
//!   "reason": "..." }       (ERROR only)
//! ```

mod codec;
mod command;
mod parser;
mod request;
mod response;

pub use codec::{
    decode_frame, encode_frame, read_frame, read_response, write_frame, write_request,
    write_response, LENGTH_PREFIX_SIZE, MAX_PAYLOAD_SIZE,
};
pub use command::{Command, CommandType};
pub use parser::{command_from_request, parse_command, parse_key};
pub use request::Request;
pub use response::{Response, Status};
