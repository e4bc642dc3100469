//! Command definitions
//!
//! Parses argument vectors off the wire into typed commands and enforces
//! the input contract the engine relies on: keys and values are non-empty
//! and free of whitespace (the SSTable line format cannot round-trip
//! embedded spaces or newlines, so they are rejected here rather than
//! silently corrupting files).

use crate::error::{Result, StrataError};

/// A parsed client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a key-value pair
    Set { key: String, value: String },

    /// Fetch a value by key
    Get { key: String },

    /// Logically delete a key
    Del { key: String },

    /// Fetch every live value in the store
    GetAll,

    /// Health check, optionally echoing a message
    Ping { message: Option<String> },

    /// Echo a message back as a bulk string
    Echo { message: String },

    /// Register this connection for update notifications
    Subscribe,

    /// Push a message to all subscribers
    Publish { message: String },

    /// Client-compat housekeeping commands answered with stub replies
    CommandList,
    Select,
    Client,
    Info,
}

impl Command {
    /// Parse an argument vector (command name first, case-insensitive)
    pub fn from_args(args: &[String]) -> Result<Command> {
        let name = args
            .first()
            .ok_or_else(|| StrataError::Protocol("no command".to_string()))?
            .to_lowercase();

        match (name.as_str(), args.len()) {
            ("set", 3) => {
                validate_key(&args[1])?;
                validate_value(&args[2])?;
                Ok(Command::Set {
                    key: args[1].clone(),
                    value: args[2].clone(),
                })
            }
            ("get", 2) => {
                validate_key(&args[1])?;
                Ok(Command::Get {
                    key: args[1].clone(),
                })
            }
            ("del", 2) => {
                validate_key(&args[1])?;
                Ok(Command::Del {
                    key: args[1].clone(),
                })
            }
            ("getall", 1) => Ok(Command::GetAll),
            ("ping", 1) => Ok(Command::Ping { message: None }),
            ("ping", 2) => Ok(Command::Ping {
                message: Some(args[1].clone()),
            }),
            ("echo", 2) => Ok(Command::Echo {
                message: args[1].clone(),
            }),
            ("subscribe", n) if n >= 2 => Ok(Command::Subscribe),
            ("publish", n) if n >= 2 => Ok(Command::Publish {
                message: args[1].clone(),
            }),
            ("command", _) => Ok(Command::CommandList),
            ("select", 2) => Ok(Command::Select),
            ("client", _) => Ok(Command::Client),
            ("info", _) => Ok(Command::Info),
            (
                "set" | "get" | "del" | "getall" | "ping" | "echo" | "select" | "subscribe"
                | "publish",
                _,
            ) => Err(
                StrataError::Protocol(format!("wrong number of arguments for '{}'", name)),
            ),
            _ => Err(StrataError::Protocol(format!("unknown command '{}'", name))),
        }
    }
}

/// Reject keys the engine and file format cannot represent
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StrataError::Protocol("empty key".to_string()));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(StrataError::Protocol(
            "key must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Reject values the engine and file format cannot represent
pub fn validate_value(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(StrataError::Protocol("empty value".to_string()));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(StrataError::Protocol(
            "value must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_set() {
        let cmd = Command::from_args(&args(&["SET", "k", "v"])).unwrap();
        assert_eq!(
            cmd,
            Command::Set {
                key: "k".to_string(),
                value: "v".to_string()
            }
        );
    }

    #[test]
    fn test_case_insensitive() {
        let cmd = Command::from_args(&args(&["GeT", "k"])).unwrap();
        assert_eq!(cmd, Command::Get { key: "k".to_string() });
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(Command::from_args(&args(&["GET", ""])).is_err());
    }

    #[test]
    fn test_rejects_whitespace_value() {
        assert!(Command::from_args(&args(&["SET", "k", "a b"])).is_err());
    }

    #[test]
    fn test_rejects_wrong_arity() {
        assert!(Command::from_args(&args(&["SET", "k"])).is_err());
        assert!(Command::from_args(&args(&["GETALL", "x"])).is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::from_args(&args(&["FLY"])).is_err());
    }
}
