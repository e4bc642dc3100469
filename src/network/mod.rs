//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread, one worker thread per connection
//! - Engine behind a single `parking_lot::Mutex` (the engine itself is
//!   single-writer and holds no locks)
//! - Pub/sub subscribers kept in a shared registry so any connection's
//!   write can notify them

mod connection;
mod server;

pub use connection::Connection;
pub use server::{Server, Subscribers};
