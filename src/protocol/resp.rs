//! RESP codec
//!
//! Stream-based reading of RESP command arrays and string serializers for
//! every reply shape the server produces.

use std::io::{BufRead, Read};

use crate::error::{Result, StrataError};

/// Maximum number of arguments in a command array
const MAX_ARGS: usize = 64;

/// Maximum size of a single bulk string argument (16 MB)
const MAX_BULK_LEN: usize = 16 * 1024 * 1024;

// =============================================================================
// Reading
// =============================================================================

/// Read one command from a stream as an argument vector.
///
/// Accepts a RESP array of bulk strings, or a plain space-separated inline
/// line as a fallback. Blocks until a complete command arrives; a clean
/// EOF surfaces as `Io(UnexpectedEof)` so the connection loop can close
/// gracefully.
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Vec<String>> {
    let line = read_line(reader)?;

    let Some(count_str) = line.strip_prefix('*') else {
        // Inline command (e.g. from telnet): split on whitespace
        return Ok(line.split_whitespace().map(str::to_string).collect());
    };

    let count: usize = count_str
        .parse()
        .map_err(|_| StrataError::Protocol(format!("invalid array header: {}", line)))?;
    if count > MAX_ARGS {
        return Err(StrataError::Protocol(format!(
            "too many arguments: {} (max {})",
            count, MAX_ARGS
        )));
    }

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        args.push(read_bulk_string(reader)?);
    }
    Ok(args)
}

/// Read one `$<len>\r\n<bytes>\r\n` bulk string
fn read_bulk_string<R: BufRead>(reader: &mut R) -> Result<String> {
    let header = read_line(reader)?;
    let len_str = header
        .strip_prefix('$')
        .ok_or_else(|| StrataError::Protocol(format!("expected bulk string, got: {}", header)))?;

    let len: usize = len_str
        .parse()
        .map_err(|_| StrataError::Protocol(format!("invalid bulk length: {}", header)))?;
    if len > MAX_BULK_LEN {
        return Err(StrataError::Protocol(format!(
            "bulk string too large: {} bytes (max {})",
            len, MAX_BULK_LEN
        )));
    }

    // Payload plus trailing \r\n
    let mut buf = vec![0u8; len + 2];
    reader.read_exact(&mut buf)?;
    buf.truncate(len);

    String::from_utf8(buf).map_err(|_| StrataError::Protocol("invalid UTF-8".to_string()))
}

/// Read one CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// =============================================================================
// Serialization
// =============================================================================

/// `+<s>\r\n`
pub fn simple_string(s: &str) -> String {
    format!("+{}\r\n", s)
}

/// `-ERR <msg>\r\n`
pub fn error(msg: &str) -> String {
    format!("-ERR {}\r\n", msg)
}

/// `:<n>\r\n`
pub fn integer(n: i64) -> String {
    format!(":{}\r\n", n)
}

/// `$<len>\r\n<s>\r\n`
pub fn bulk_string(s: &str) -> String {
    format!("${}\r\n{}\r\n", s.len(), s)
}

/// Null bulk string: the wire form of "no value"
pub fn null_bulk() -> String {
    "$-1\r\n".to_string()
}

/// Array of bulk strings
pub fn array(items: &[String]) -> String {
    let mut out = format!("*{}\r\n", items.len());
    for item in items {
        out.push_str(&bulk_string(item));
    }
    out
}

/// `*0\r\n`
pub fn empty_array() -> String {
    "*0\r\n".to_string()
}

/// Subscribe confirmation: `["subscribe", <channel>, 1]`
pub fn subscribe_confirmation(channel: &str) -> String {
    format!(
        "*3\r\n{}{}{}",
        bulk_string("subscribe"),
        bulk_string(channel),
        integer(1)
    )
}

/// Pub/sub push frame: `["message", <channel>, <payload>]`
pub fn message_push(channel: &str, payload: &str) -> String {
    format!(
        "*3\r\n{}{}{}",
        bulk_string("message"),
        bulk_string(channel),
        bulk_string(payload)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_resp_array() {
        let wire = "*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n";
        let args = read_command(&mut Cursor::new(wire)).unwrap();
        assert_eq!(args, vec!["SET", "k", "v"]);
    }

    #[test]
    fn test_read_inline_command() {
        let args = read_command(&mut Cursor::new("GET key\r\n")).unwrap();
        assert_eq!(args, vec!["GET", "key"]);
    }

    #[test]
    fn test_eof_is_unexpected_eof() {
        let err = read_command(&mut Cursor::new("")).unwrap_err();
        match err {
            crate::StrataError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof)
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_bulk_header() {
        let wire = "*1\r\n:3\r\nfoo\r\n";
        assert!(read_command(&mut Cursor::new(wire)).is_err());
    }

    #[test]
    fn test_serializers() {
        assert_eq!(simple_string("OK"), "+OK\r\n");
        assert_eq!(error("boom"), "-ERR boom\r\n");
        assert_eq!(integer(2), ":2\r\n");
        assert_eq!(bulk_string("foo"), "$3\r\nfoo\r\n");
        assert_eq!(null_bulk(), "$-1\r\n");
        assert_eq!(
            array(&["a".to_string(), "bb".to_string()]),
            "*2\r\n$1\r\na\r\n$2\r\nbb\r\n"
        );
    }

    #[test]
    fn test_message_push_frame() {
        assert_eq!(
            message_push("updates", "UPDATE"),
            "*3\r\n$7\r\nmessage\r\n$7\r\nupdates\r\n$6\r\nUPDATE\r\n"
        );
    }
}
