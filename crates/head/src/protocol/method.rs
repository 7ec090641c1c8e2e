//! Request verbs recognized at the start of a connection.
//!
//! The decoder only ever looks at the first four bytes of a message to pick a
//! verb, so every variant is keyed by a fixed 4-byte prefix. `GET ` and `PUT `
//! include their trailing space; the longer verbs keep a tail that still has
//! to be consumed from the connection.

use std::fmt;
use std::str::FromStr;

use crate::protocol::HeadError;

/// Accepted start tokens, used in protocol error messages.
pub(crate) const ACCEPTED_VERBS: &str = "GET/PUT/HEAD/POST/DELETE/OPTIONS/PATCH/TRACE or HTTP";

/// An HTTP request method this codec knows how to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Head,
    Post,
    Delete,
    Options,
    Patch,
    Trace,
}

impl Method {
    pub const ALL: [Method; 8] =
        [Method::Get, Method::Put, Method::Head, Method::Post, Method::Delete, Method::Options, Method::Patch, Method::Trace];

    /// The canonical upper-case name of this method.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
        }
    }

    /// Resolves the 4-byte prefix read from the wire.
    pub(crate) fn from_prefix(prefix: &[u8; 4]) -> Option<Self> {
        match prefix {
            b"GET " => Some(Method::Get),
            b"PUT " => Some(Method::Put),
            b"HEAD" => Some(Method::Head),
            b"POST" => Some(Method::Post),
            b"DELE" => Some(Method::Delete),
            b"OPTI" => Some(Method::Options),
            b"PATC" => Some(Method::Patch),
            b"TRAC" => Some(Method::Trace),
            _ => None,
        }
    }

    /// Bytes of the verb left on the wire after the prefix, not counting the
    /// separating space. `None` when the prefix already consumed the space.
    pub(crate) fn verb_tail(self) -> Option<&'static [u8]> {
        match self {
            Method::Get | Method::Put => None,
            other => Some(&other.as_str().as_bytes()[4..]),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = HeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| HeadError::protocol(format!("{ACCEPTED_VERBS} expected, got '{s}'")))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Put => http::Method::PUT,
            Method::Head => http::Method::HEAD,
            Method::Post => http::Method::POST,
            Method::Delete => http::Method::DELETE,
            Method::Options => http::Method::OPTIONS,
            Method::Patch => http::Method::PATCH,
            Method::Trace => http::Method::TRACE,
        }
    }
}
