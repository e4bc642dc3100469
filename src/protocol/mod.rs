//! Protocol Module
//!
//! RESP (Redis wire protocol) subset for client-server communication.
//! Inbound commands arrive as RESP arrays of bulk strings; inline
//! space-separated commands are accepted as a fallback for telnet-style
//! clients.
//!
//! ## Request Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<arg>\r\n      (repeated argc times)
//! ```
//!
//! ## Reply Types
//! - `+OK\r\n`          simple string
//! - `-ERR msg\r\n`     error
//! - `:1\r\n`           integer
//! - `$3\r\nfoo\r\n`    bulk string (`$-1\r\n` = null)
//! - `*N\r\n...`        array
//!
//! The command layer maps the wire surface onto the four engine
//! operations and validates keys/values before they can reach the engine.

mod command;
mod resp;

pub use command::{validate_key, validate_value, Command};
pub use resp::{
    array, bulk_string, empty_array, error, integer, message_push, null_bulk, read_command,
    simple_string, subscribe_confirmation,
};

/// The single pub/sub channel the server publishes updates on
pub const UPDATES_CHANNEL: &str = "updates";
