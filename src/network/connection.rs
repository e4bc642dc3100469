//! Connection Handler
//!
//! Handles one client connection: reads RESP commands in a loop, maps
//! them onto the four engine operations, and writes replies. Lookup
//! misses and tombstoned keys both collapse to a null bulk reply at this
//! boundary; inside the engine they stay distinct.

use std::io::{BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::engine::{Engine, Lookup};
use crate::error::{Result, StrataError};
use crate::protocol::{self, Command, UPDATES_CHANNEL};

use super::Subscribers;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Shared storage engine, serialized behind one mutex
    engine: Arc<Mutex<Engine>>,

    /// Shared pub/sub subscriber registry
    subscribers: Subscribers,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(
        stream: TcpStream,
        engine: Arc<Mutex<Engine>>,
        subscribers: Subscribers,
    ) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            engine,
            subscribers,
            peer_addr,
        })
    }

    /// Configure connection timeouts
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    pub fn handle(&mut self) -> Result<()> {
        debug!("connection established from {}", self.peer_addr);

        loop {
            let args = match protocol::read_command(&mut self.reader) {
                Ok(args) => args,
                Err(StrataError::Io(ref e)) if Self::is_disconnect(e.kind()) => {
                    debug!("client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(StrataError::Protocol(msg)) => {
                    // Malformed frame: report and keep serving
                    self.send(&protocol::error(&msg))?;
                    continue;
                }
                Err(e) => {
                    warn!("error reading from {}: {}", self.peer_addr, e);
                    let _ = self.send(&protocol::error(&e.to_string()));
                    return Err(e);
                }
            };

            trace!("received from {}: {:?}", self.peer_addr, args);

            let reply = match Command::from_args(&args) {
                Ok(command) => self.execute_command(command)?,
                Err(e) => protocol::error(&e.to_string()),
            };

            if let Err(e) = self.send(&reply) {
                if let StrataError::Io(ref io_err) = e {
                    if Self::is_disconnect(io_err.kind()) {
                        debug!(
                            "client {} disconnected before reply could be sent",
                            self.peer_addr
                        );
                        return Ok(());
                    }
                }
                warn!("error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Execute a command against the engine and build the RESP reply
    fn execute_command(&mut self, command: Command) -> Result<String> {
        let reply = match command {
            Command::Set { key, value } => match self.engine.lock().set(key, value) {
                Ok(()) => {
                    self.notify_update();
                    protocol::simple_string("OK")
                }
                Err(e) => {
                    warn!("SET failed: {}", e);
                    protocol::error(&e.to_string())
                }
            },
            Command::Get { key } => match self.engine.lock().get(&key) {
                Lookup::Found(value) => protocol::bulk_string(&value),
                Lookup::Deleted | Lookup::Miss => protocol::null_bulk(),
            },
            Command::Del { key } => match self.engine.lock().remove(key) {
                Ok(()) => {
                    self.notify_update();
                    protocol::simple_string("OK")
                }
                Err(e) => {
                    warn!("DEL failed: {}", e);
                    protocol::error(&e.to_string())
                }
            },
            Command::GetAll => {
                let values: Vec<String> = self
                    .engine
                    .lock()
                    .get_all_pairs()
                    .into_iter()
                    .map(|(_, v)| v)
                    .collect();
                protocol::array(&values)
            }
            Command::Ping { message } => match message {
                Some(msg) => protocol::simple_string(&msg),
                None => protocol::simple_string("PONG"),
            },
            Command::Echo { message } => protocol::bulk_string(&message),
            Command::Subscribe => {
                let stream = self.writer.get_ref().try_clone()?;
                self.subscribers.add(stream);
                debug!("client {} subscribed to {}", self.peer_addr, UPDATES_CHANNEL);
                protocol::subscribe_confirmation(UPDATES_CHANNEL)
            }
            Command::Publish { message } => {
                let reached = self.subscribers.publish(&message);
                protocol::integer(reached as i64)
            }
            Command::CommandList => protocol::empty_array(),
            Command::Select | Command::Client => protocol::simple_string("OK"),
            Command::Info => protocol::bulk_string("redis_version:6.0.0"),
        };
        Ok(reply)
    }

    /// Notify subscribers that the store changed
    fn notify_update(&self) {
        if !self.subscribers.is_empty() {
            self.subscribers.publish("UPDATE");
        }
    }

    /// Write a reply to the client
    fn send(&mut self, reply: &str) -> Result<()> {
        self.writer.write_all(reply.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Error kinds that mean the client went away
    fn is_disconnect(kind: std::io::ErrorKind) -> bool {
        matches!(
            kind,
            std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::WouldBlock
                | std::io::ErrorKind::TimedOut
        )
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
