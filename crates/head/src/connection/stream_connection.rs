use std::io;
use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use tracing::trace;

use super::{decode_line, not_connected, Connection};

/// Default upper bound for a single line, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// Bytes requested from the stream per read
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// [`Connection`] over a blocking stream, buffering reads so lines can be
/// split without losing the bytes that follow them.
///
/// [`Connection::disconnect`] drops the stream, which closes sockets.
#[derive(Debug)]
pub struct StreamConnection<S> {
    stream: Option<S>,
    buffer: BytesMut,
    max_line_length: usize,
}

impl<S: Read + Write> StreamConnection<S> {
    pub fn new(stream: S) -> Self {
        Self { stream: Some(stream), buffer: BytesMut::with_capacity(READ_CHUNK_SIZE), max_line_length: DEFAULT_MAX_LINE_LENGTH }
    }

    /// Lines longer than `max_line_length` bytes fail with `InvalidData`.
    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.stream.as_mut()
    }

    /// Bytes read from the stream but not consumed yet, e.g. the start of a body.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the stream and the bytes buffered ahead of it, `None` after a
    /// disconnect.
    pub fn into_parts(self) -> Option<(S, BytesMut)> {
        let Self { stream, buffer, .. } = self;
        stream.map(|stream| (stream, buffer))
    }

    /// Reads once from the stream into the buffer, returning the number of new bytes.
    fn fill_buf(&mut self) -> io::Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let n = loop {
            match stream.read(&mut chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        };
        self.buffer.put_slice(&chunk[..n]);
        Ok(n)
    }

    fn line_too_long(&self) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, format!("line exceeds {} bytes", self.max_line_length))
    }
}

impl<S: Read + Write> Connection for StreamConnection<S> {
    /// Fills all of `buf` unless the peer closes the stream first.
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            if self.buffer.is_empty() && self.fill_buf()? == 0 {
                break;
            }
            let n = (buf.len() - filled).min(self.buffer.len());
            self.buffer.copy_to_slice(&mut buf[filled..filled + n]);
            filled += n;
        }
        Ok(filled)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        if self.buffer.is_empty() && self.fill_buf()? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(self.buffer.get_u8())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut scanned = 0;
        loop {
            if let Some(pos) = self.buffer[scanned..].iter().position(|b| *b == b'\n') {
                let end = scanned + pos + 1;
                if end > self.max_line_length + 2 {
                    return Err(self.line_too_long());
                }
                let raw = self.buffer.split_to(end);
                return decode_line(&raw).map(Some);
            }

            scanned = self.buffer.len();
            if scanned > self.max_line_length + 2 {
                return Err(self.line_too_long());
            }

            if self.fill_buf()? == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let raw = self.buffer.split();
                return decode_line(&raw).map(Some);
            }
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        let mut out = BytesMut::with_capacity(line.len() + 2);
        out.put_slice(line.as_bytes());
        out.put_slice(b"\r\n");
        stream.write_all(&out)?;
        stream.flush()
    }

    fn disconnect(&mut self) -> io::Result<()> {
        if self.stream.take().is_some() {
            trace!(discarded = self.buffer.len(), "stream connection disconnected");
        }
        self.buffer.clear();
        Ok(())
    }
}
