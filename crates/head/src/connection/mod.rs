//! The transport seen by the header codec
//!
//! The codec never touches sockets directly. It needs a byte-oriented,
//! line-delimited [`Connection`] and this module provides two of them:
//!
//! - [`StreamConnection`]: buffers any blocking `Read + Write` stream such as a
//!   `TcpStream`
//! - [`BufferConnection`]: an in-memory connection over fixed input that
//!   records everything written to it
//!
//! Lines end with `\n`, an optional `\r` before it is stripped. Both
//! connections reject lines that are not valid UTF-8.

use std::io;

mod buffer_connection;
mod stream_connection;

pub use buffer_connection::BufferConnection;
pub use stream_connection::{StreamConnection, DEFAULT_MAX_LINE_LENGTH};

/// Blocking, line-oriented access to a peer.
#[cfg_attr(test, mockall::automock)]
pub trait Connection {
    /// Reads up to `buf.len()` bytes, returning how many were read. `0` means
    /// the peer closed the connection.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads a single byte, failing with `UnexpectedEof` once the peer is gone.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Reads one line without its line break. `None` once the peer is gone.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Writes `line` followed by CRLF.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Closes the connection; later calls fail with `NotConnected`.
    fn disconnect(&mut self) -> io::Result<()>;
}

/// Turns raw line bytes, line break included or not, into a `String`.
fn decode_line(raw: &[u8]) -> io::Result<String> {
    let line = raw.strip_suffix(b"\n").unwrap_or(raw);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8(line.to_vec()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "connection is disconnected")
}
