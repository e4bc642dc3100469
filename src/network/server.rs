//! TCP Server
//!
//! Accepts connections and spawns a handler thread per client.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::protocol::{self, UPDATES_CHANNEL};

use super::Connection;

/// Shared registry of pub/sub subscriber streams.
///
/// Each subscribing connection contributes a clone of its TCP stream;
/// publishers write push frames directly to every registered stream.
/// Streams whose write fails are dropped from the registry.
#[derive(Clone, Default)]
pub struct Subscribers {
    streams: Arc<Mutex<Vec<TcpStream>>>,
}

impl Subscribers {
    /// Register a subscriber stream
    pub fn add(&self, stream: TcpStream) {
        self.streams.lock().push(stream);
    }

    /// Push a message frame to every subscriber; returns how many were
    /// reached. Dead streams are pruned as a side effect.
    pub fn publish(&self, payload: &str) -> usize {
        let frame = protocol::message_push(UPDATES_CHANNEL, payload);
        let mut streams = self.streams.lock();
        let before = streams.len();
        streams.retain_mut(|s| s.write_all(frame.as_bytes()).and_then(|_| s.flush()).is_ok());
        let reached = streams.len();
        if reached < before {
            warn!(dropped = before - reached, "pruned dead subscribers");
        }
        reached
    }

    /// Number of registered subscribers
    pub fn len(&self) -> usize {
        self.streams.lock().len()
    }

    /// True if no subscriber is registered
    pub fn is_empty(&self) -> bool {
        self.streams.lock().is_empty()
    }
}

/// TCP server for StrataKV
pub struct Server {
    config: Config,
    engine: Arc<Mutex<Engine>>,
    subscribers: Subscribers,
}

impl Server {
    /// Create a new server around a shared engine
    pub fn new(config: Config, engine: Arc<Mutex<Engine>>) -> Self {
        Self {
            config,
            engine,
            subscribers: Subscribers::default(),
        }
    }

    /// Start the server (blocking accept loop)
    pub fn run(&mut self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.listen_addr)?;
        info!(addr = %self.config.listen_addr, "server listening");

        let active = Arc::new(AtomicUsize::new(0));

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            if active.load(Ordering::Relaxed) >= self.config.max_connections {
                warn!("connection limit reached, refusing client");
                let mut stream = stream;
                let _ = stream.write_all(protocol::error("max connections reached").as_bytes());
                continue;
            }

            let engine = Arc::clone(&self.engine);
            let subscribers = self.subscribers.clone();
            let config = self.config.clone();
            let active = Arc::clone(&active);

            active.fetch_add(1, Ordering::Relaxed);
            thread::spawn(move || {
                match Connection::new(stream, engine, subscribers) {
                    Ok(mut conn) => {
                        if let Err(e) =
                            conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)
                        {
                            warn!(error = %e, "failed to set connection timeouts");
                        }
                        if let Err(e) = conn.handle() {
                            warn!(peer = conn.peer_addr(), error = %e, "connection error");
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to set up connection"),
                }
                active.fetch_sub(1, Ordering::Relaxed);
            });
        }

        Ok(())
    }
}
