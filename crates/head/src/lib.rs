//! A streaming HTTP/1.x start-line and header-block codec
//!
//! This crate reads the start line and header section of an HTTP/1.x message
//! straight off a blocking, line-oriented connection and writes it back out
//! byte for byte. Message bodies, keep-alive policy and the transport itself
//! stay with the caller.
//!
//! # Features
//!
//! - Request and response framing, recognized from the first four bytes
//! - Repeated header names merged into ordered multi-value fields
//! - Case-insensitive lookups with the original casing kept for output
//! - Per-block limit on header lines, disconnecting peers that exceed it
//! - Serialization into a `BytesMut` or line by line onto a connection
//!
//! # Example
//!
//! ```no_run
//! use std::net::TcpListener;
//! use http::StatusCode;
//! use micro_head::connection::StreamConnection;
//! use micro_head::protocol::HeaderBlock;
//! use tracing::{info, warn};
//!
//! let listener = TcpListener::bind("127.0.0.1:8080").unwrap();
//! for stream in listener.incoming().flatten() {
//!     let mut connection = StreamConnection::new(stream);
//!     let request = match HeaderBlock::read_from(&mut connection) {
//!         Ok(Some(request)) => request,
//!         Ok(None) => continue,
//!         Err(e) => {
//!             warn!(cause = %e, "bad request header");
//!             continue;
//!         }
//!     };
//!     info!(path = ?request.request_path(), "request received");
//!
//!     let mut response = HeaderBlock::new();
//!     response.set_response_first_line("1.1", StatusCode::NO_CONTENT);
//!     response.write_to(&mut connection).unwrap();
//! }
//! ```

pub mod codec;
pub mod connection;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use indoc::indoc;

    use crate::connection::BufferConnection;
    use crate::protocol::{HeaderBlock, HeaderField};

    fn reparse(block: &HeaderBlock) -> HeaderBlock {
        let mut connection = BufferConnection::new(block.render());
        HeaderBlock::read_from(&mut connection).unwrap().unwrap()
    }

    fn assert_same(left: &HeaderBlock, right: &HeaderBlock) {
        assert_eq!(left.first_line(), right.first_line());
        assert_eq!(left.fields().collect::<Vec<&HeaderField>>(), right.fields().collect::<Vec<&HeaderField>>());
    }

    #[test]
    fn request_round_trip() {
        let mut block = HeaderBlock::new();
        block.set_request_first_line("1.1", "PATCH", "/items/7?x=1");
        block.set_header_value("Host", "example.com");
        block.set_content_type("application/merge-patch+json");
        block.append_header("X-Trace", "a");
        block.append_header("x-trace", "b");

        let parsed = reparse(&block);

        assert_same(&block, &parsed);
        assert_eq!(parsed.method(), block.method());
        assert_eq!(parsed.request_path(), Some("/items/7?x=1"));
        assert_eq!(parsed.request_version(), Some("1.1"));
    }

    #[test]
    fn response_round_trip() {
        let mut block = HeaderBlock::new();
        block.set_response_first_line("1.1", StatusCode::SERVICE_UNAVAILABLE);
        block.append_header("Set-Cookie", "a=1; Path=/");
        block.append_header("Set-Cookie", "b=2");
        block.set_header_value("Retry-After", "120");

        let parsed = reparse(&block);

        assert_same(&block, &parsed);
        assert_eq!(parsed.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(parsed.render(), block.render());
    }

    #[test]
    fn round_trip_from_wire() {
        let str = indoc! {r##"
        GET /index/?a=1&b=2&a=3 HTTP/1.1
        Host: 127.0.0.1:8080
        Connection: keep-alive
        sec-ch-ua: "#Not_A Brand";v="99", "Microsoft Edge";v="109", "Chromium";v="109"
        Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8
        Accept-Encoding: gzip, deflate, br
        Cookie: a=1
        Cookie: b=2

        "##};

        let block = HeaderBlock::read_from(&mut BufferConnection::new(str)).unwrap().unwrap();
        let parsed = reparse(&block);

        assert_same(&block, &parsed);
        assert_eq!(block.len(), 6);
        assert_eq!(block.header_value("cookie").unwrap(), r#""a=1","b=2""#);
        assert_eq!(block.render(), str.replace('\n', "\r\n"));
    }

    #[test]
    fn round_trip_many_fields() {
        let mut block = HeaderBlock::new();
        block.set_request_first_line("1.1", "GET", "/");
        for i in 0..99 {
            block.set_header_value(&format!("X-Field-{i}"), i.to_string());
        }

        let parsed = reparse(&block);

        assert_same(&block, &parsed);
    }
}
