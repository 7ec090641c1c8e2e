//! Codec for HTTP/1.x header blocks
//!
//! - [`HeaderDecoder`]: reads a start line and header section off a
//!   [`Connection`](crate::connection::Connection) into a
//!   [`HeaderBlock`](crate::protocol::HeaderBlock)
//! - [`HeaderEncoder`]: renders a block into a `BytesMut` or writes it to a
//!   connection line by line
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use micro_head::codec::{HeaderDecoder, HeaderEncoder};
//! use micro_head::connection::BufferConnection;
//! use micro_head::protocol::HeaderBlock;
//! use tokio_util::codec::Encoder;
//!
//! let mut connection = BufferConnection::new("GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
//! let mut block = HeaderBlock::new();
//! assert!(HeaderDecoder.decode(&mut connection, &mut block).unwrap());
//!
//! let mut buffer = BytesMut::new();
//! HeaderEncoder.encode(&block, &mut buffer).unwrap();
//! assert_eq!(&buffer[..], b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
//! ```

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
