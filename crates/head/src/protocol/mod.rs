//! Data model of an HTTP/1.x header block.
//!
//! - [`HeaderBlock`]: start line plus case-insensitive, insertion-ordered fields,
//!   with typed accessors for the request line or status line
//! - [`HeaderField`]: one header name with its ordered values
//! - [`Method`]: the request verbs recognized on the wire
//! - [`HeaderLimits`]: per-block bound on the number of header lines
//! - [`HeadError`]: everything that can go wrong while reading or writing a block

mod error;
pub use error::HeadError;

mod field;
pub use field::HeaderField;
pub(crate) use field::split_header_line;

mod header_block;
pub use header_block::HeaderBlock;

mod limits;
pub use limits::{HeaderLimits, DEFAULT_MAX_HEADER_LINES};

pub(crate) mod method;
pub use method::Method;
