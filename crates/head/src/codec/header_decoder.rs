//! Streaming decoder for the start line and header section of a message.
//!
//! The decoder reads straight off a [`Connection`], consuming exactly the bytes
//! it needs and never the message body that may follow the blank line.
//!
//! # State machine
//!
//! ```text
//! AwaitingMethod ──4 bytes──▶ ReadingFirstLine ──line──▶ ReadingHeaderLines ──blank line──▶ Done
//!       │                                                        │
//!       └─ 0 bytes: clean disconnect                             └─ limit exceeded: disconnect + error
//! ```
//!
//! - `AwaitingMethod` receives four bytes and matches them against the known
//!   verb prefixes (`GET `, `PUT `, `HEAD`, `POST`, `DELE`, `OPTI`, `PATC`,
//!   `TRAC`) or `HTTP` for a status line. Longer verbs have their remaining
//!   letters and the separating space consumed byte by byte.
//! - `ReadingFirstLine` reads the rest of the start line and glues the verb
//!   back in front of it.
//! - `ReadingHeaderLines` splits `Name: Value` lines into the block until a
//!   blank line, enforcing the block's [`HeaderLimits`](crate::protocol::HeaderLimits).
//! - `Done` parses the start line into its structured parts.

use std::io;

use tracing::{debug, error, trace, warn};

use crate::connection::Connection;
use crate::protocol::method::ACCEPTED_VERBS;
use crate::protocol::{split_header_line, HeadError, HeaderBlock, Method};

/// The first four bytes of a status line.
const RESPONSE_PREFIX: &[u8; 4] = b"HTTP";

/// What the first bytes of a message announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartToken {
    Request(Method),
    Response,
}

impl StartToken {
    /// Rebuilds the full start line from the consumed token and the rest of the line.
    fn join(self, rest: &str) -> String {
        match self {
            StartToken::Request(method) => format!("{method} {rest}"),
            StartToken::Response => format!("HTTP{rest}"),
        }
    }
}

#[derive(Debug)]
enum DecodeState {
    AwaitingMethod,
    ReadingFirstLine(StartToken),
    ReadingHeaderLines,
    Done,
}

/// Decoder turning connection input into a [`HeaderBlock`].
///
/// The decoder itself is stateless between calls; every call to
/// [`HeaderDecoder::decode`] runs the state machine from the start.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Reads one header block from `connection` into `block`.
    ///
    /// `block` is cleared first; only its limits carry over. Long verbs are
    /// matched letter by letter, so `HEADX` is rejected rather than skipped.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` when a complete block was read
    /// - `Ok(false)` when the connection was closed before any byte arrived
    ///
    /// # Errors
    ///
    /// - [`HeadError::Protocol`] when the verb is truncated or unknown
    /// - [`HeadError::HeaderFormat`] when a header line has no colon or the
    ///   start line is malformed
    /// - [`HeadError::TooManyHeaderLines`] when the block holds more distinct
    ///   names than its limits allow; the connection is disconnected first
    /// - [`HeadError::Io`] when the connection fails
    pub fn decode<C: Connection + ?Sized>(&mut self, connection: &mut C, block: &mut HeaderBlock) -> Result<bool, HeadError> {
        *block = HeaderBlock::with_limits(block.limits());
        let mut state = DecodeState::AwaitingMethod;

        loop {
            state = match state {
                DecodeState::AwaitingMethod => match read_start_token(connection)? {
                    Some(token) => {
                        if let StartToken::Request(method) = token {
                            block.set_method(Some(method));
                        }
                        DecodeState::ReadingFirstLine(token)
                    }
                    None => {
                        debug!("connection closed before a header block was received");
                        return Ok(false);
                    }
                },

                DecodeState::ReadingFirstLine(token) => match connection.read_line()? {
                    Some(rest) if !rest.is_empty() => {
                        let first_line = token.join(&rest);
                        trace!(first_line = %first_line, "read start line");
                        block.set_first_line(first_line);
                        DecodeState::ReadingHeaderLines
                    }
                    // an empty start line is rejected when the block is parsed
                    _ => DecodeState::Done,
                },

                DecodeState::ReadingHeaderLines => match connection.read_line()? {
                    Some(line) if !line.is_empty() => {
                        read_header_line(connection, block, &line)?;
                        DecodeState::ReadingHeaderLines
                    }
                    _ => DecodeState::Done,
                },

                DecodeState::Done => {
                    block.parse_first_line()?;
                    debug!(header_count = block.len(), response = block.is_response(), "decoded header block");
                    return Ok(true);
                }
            };
        }
    }
}

/// Reads and classifies the first four bytes of a message.
fn read_start_token<C: Connection + ?Sized>(connection: &mut C) -> Result<Option<StartToken>, HeadError> {
    let mut prefix = [0u8; 4];
    match connection.receive(&mut prefix)? {
        0 => return Ok(None),
        received @ 1..=3 => {
            return Err(HeadError::protocol(format!("incomplete header verb received ({received} of 4 bytes)")));
        }
        _ => {}
    }

    if &prefix == RESPONSE_PREFIX {
        trace!("status line prefix received");
        return Ok(Some(StartToken::Response));
    }

    let Some(method) = Method::from_prefix(&prefix) else {
        return Err(unknown_verb(&prefix));
    };

    if let Some(tail) = method.verb_tail() {
        skip_verb_tail(connection, &prefix, tail)?;
    }

    trace!(method = %method, "request verb received");
    Ok(Some(StartToken::Request(method)))
}

/// Consumes the rest of a long verb and the space after it, one byte at a
/// time so nothing past the space is read.
fn skip_verb_tail<C: Connection + ?Sized>(connection: &mut C, prefix: &[u8; 4], tail: &[u8]) -> Result<(), HeadError> {
    let mut seen = prefix.to_vec();
    for &expected in tail.iter().chain(b" ") {
        let byte = match connection.read_byte() {
            Ok(byte) => byte,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(HeadError::protocol("incomplete header verb received"));
            }
            Err(e) => return Err(e.into()),
        };
        seen.push(byte);
        if byte != expected {
            return Err(unknown_verb(&seen));
        }
    }
    Ok(())
}

fn unknown_verb(seen: &[u8]) -> HeadError {
    HeadError::protocol(format!("{ACCEPTED_VERBS} expected, got '{}'", String::from_utf8_lossy(seen)))
}

/// Adds one `Name: Value` line to the block and enforces the line limit.
fn read_header_line<C: Connection + ?Sized>(connection: &mut C, block: &mut HeaderBlock, line: &str) -> Result<(), HeadError> {
    let (name, value) = split_header_line(line)?;
    trace!(header_name = name, header_value = value, "read header line");

    let field_count = block.append_header(name, value);
    let limits = block.limits();
    if limits.exceeded_by(field_count) {
        warn!(max_header_lines = limits.max_header_lines, field_count, "too many header lines, disconnecting");
        if let Err(e) = connection.disconnect() {
            error!(cause = %e, "failed to disconnect after header limit was exceeded");
        }
        return Err(HeadError::too_many_header_lines(limits.max_header_lines));
    }

    Ok(())
}
