//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - One request and one response per connection
//! - Commands routed through Engine

mod connection;
mod pool;
mod server;

pub use connection::Connection;
pub use pool::WorkerPool;
pub use server::{Server, ShutdownHandle};
