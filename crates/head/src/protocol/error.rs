use std::io;
use thiserror::Error;

/// Errors raised while reading, building or writing a header block.
///
/// A connection that closes before sending a single byte is not an error;
/// [`HeaderBlock::read_from`](crate::protocol::HeaderBlock::read_from) reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum HeadError {
    #[error("invalid http request mode: {reason}")]
    Protocol { reason: String },

    #[error("invalid http header: {reason}")]
    HeaderFormat { reason: String },

    #[error("too many header lines received (maximum is set to {max_lines})")]
    TooManyHeaderLines { max_lines: usize },

    #[error("header value index {index} out of range, field has {len} values")]
    ValueIndexOutOfRange { index: usize, len: usize },

    #[error("header can't be converted: {reason}")]
    InvalidHeaderMap { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl HeadError {
    pub fn protocol<S: ToString>(str: S) -> Self {
        Self::Protocol { reason: str.to_string() }
    }

    pub fn header_format<S: ToString>(str: S) -> Self {
        Self::HeaderFormat { reason: str.to_string() }
    }

    pub fn too_many_header_lines(max_lines: usize) -> Self {
        Self::TooManyHeaderLines { max_lines }
    }

    pub fn value_index_out_of_range(index: usize, len: usize) -> Self {
        Self::ValueIndexOutOfRange { index, len }
    }

    pub fn invalid_header_map<S: ToString>(str: S) -> Self {
        Self::InvalidHeaderMap { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
