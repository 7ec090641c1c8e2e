//! Serialization of a [`HeaderBlock`] back into its wire form.
//!
//! Two outputs are supported:
//!
//! - a [`BytesMut`] buffer through the [`Encoder`] implementation, producing
//!   the start line, every field line and the blank terminator, CRLF delimited
//! - a [`Connection`] through [`HeaderEncoder::write_to`], issuing one
//!   `write_line` per start line and per field followed by an empty line
//!
//! Fields are written in insertion order; a field with several values becomes
//! several `Name: Value` lines.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::connection::Connection;
use crate::protocol::{HeadError, HeaderBlock};

/// Initial buffer size reserved for a rendered header block
const INIT_HEADER_SIZE: usize = 4 * 1024;

/// Encoder for [`HeaderBlock`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl HeaderEncoder {
    /// Writes `block` to `connection` as discrete lines.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::Io`] when a write fails; lines already written stay
    /// on the connection.
    pub fn write_to<C: Connection + ?Sized>(&self, block: &HeaderBlock, connection: &mut C) -> Result<(), HeadError> {
        connection.write_line(block.first_line()).map_err(HeadError::io)?;
        for field in block.fields() {
            connection.write_line(&field.render()).map_err(HeadError::io)?;
        }
        connection.write_line("").map_err(HeadError::io)?;

        trace!(header_count = block.len(), "wrote header block");
        Ok(())
    }
}

impl<'a> Encoder<&'a HeaderBlock> for HeaderEncoder {
    type Error = HeadError;

    /// Appends the rendered block to `dst`.
    fn encode(&mut self, block: &'a HeaderBlock, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "{block}")?;
        Ok(())
    }
}

/// Writer appending straight into a [`BytesMut`] that already reserved room.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
