use std::io;

use bytes::{Buf, Bytes};

use super::{decode_line, not_connected, Connection};

/// In-memory [`Connection`] reading from fixed input and recording every
/// written line.
#[derive(Debug, Default)]
pub struct BufferConnection {
    input: Bytes,
    written: Vec<String>,
    disconnected: bool,
}

impl BufferConnection {
    pub fn new(input: impl Into<Bytes>) -> Self {
        Self { input: input.into(), written: Vec::new(), disconnected: false }
    }

    /// Input not consumed yet.
    pub fn remaining(&self) -> &[u8] {
        &self.input
    }

    /// Lines written so far, without their CRLF.
    pub fn written_lines(&self) -> &[String] {
        &self.written
    }

    /// Everything written so far as it would appear on the wire.
    pub fn output(&self) -> String {
        self.written.iter().map(|line| format!("{line}\r\n")).collect()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn ensure_connected(&self) -> io::Result<()> {
        if self.disconnected { Err(not_connected()) } else { Ok(()) }
    }
}

impl Connection for BufferConnection {
    fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_connected()?;
        let n = buf.len().min(self.input.len());
        self.input.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.ensure_connected()?;
        if self.input.has_remaining() { Ok(self.input.get_u8()) } else { Err(io::ErrorKind::UnexpectedEof.into()) }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.ensure_connected()?;
        if self.input.is_empty() {
            return Ok(None);
        }

        let end = self.input.iter().position(|b| *b == b'\n').map_or(self.input.len(), |pos| pos + 1);
        let raw = self.input.split_to(end);
        decode_line(&raw).map(Some)
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.ensure_connected()?;
        self.written.push(line.to_string());
        Ok(())
    }

    fn disconnect(&mut self) -> io::Result<()> {
        self.disconnected = true;
        Ok(())
    }
}
