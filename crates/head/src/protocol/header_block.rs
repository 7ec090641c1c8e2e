//! The start line and header section of one HTTP/1.x message.
//!
//! A [`HeaderBlock`] is either read off a [`Connection`] with
//! [`HeaderBlock::read_from`] or assembled by hand through the setters, and
//! turned back into wire bytes with [`HeaderBlock::render`] or
//! [`HeaderBlock::write_to`].
//!
//! Field names are looked up case-insensitively: the map is keyed by the
//! lower-cased name while each [`HeaderField`] keeps the casing it was
//! received with, so output matches input.

use std::borrow::Cow;
use std::fmt;

use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode, Version};
use indexmap::IndexMap;
use mime::Mime;

use crate::codec::{HeaderDecoder, HeaderEncoder};
use crate::connection::Connection;
use crate::ensure;
use crate::protocol::{HeadError, HeaderField, HeaderLimits, Method};

const HEADER_CONTENT_TYPE: &str = "Content-Type";
const HEADER_HOST: &str = "Host";
const HTTP_PREFIX: &str = "HTTP/";

/// Start line plus an insertion-ordered, case-insensitive set of header fields.
#[derive(Debug, Clone, Default)]
pub struct HeaderBlock {
    first_line: String,
    fields: IndexMap<String, HeaderField>,
    method: Option<Method>,
    request_type: Option<String>,
    request_path: Option<String>,
    request_version: Option<String>,
    status: StatusCode,
    limits: HeaderLimits,
}

impl HeaderBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: HeaderLimits) -> Self {
        Self { limits, ..Self::default() }
    }

    /// Reads one header block with default limits.
    ///
    /// Returns `Ok(None)` when the peer closed the connection before sending
    /// anything.
    ///
    /// # Errors
    ///
    /// See [`HeaderBlock::read_header`].
    pub fn read_from<C: Connection + ?Sized>(connection: &mut C) -> Result<Option<Self>, HeadError> {
        let mut block = Self::new();
        Ok(block.read_header(connection)?.then_some(block))
    }

    /// Reads a header block into `self`, keeping the configured limits and
    /// discarding any fields or start line held before. Same as
    /// [`HeaderDecoder::decode`].
    ///
    /// Returns `Ok(false)` on a clean disconnect, `Ok(true)` once the blank
    /// terminator line has been consumed and the start line parsed.
    ///
    /// # Errors
    ///
    /// - [`HeadError::Protocol`] for a truncated or unknown verb
    /// - [`HeadError::HeaderFormat`] for a header line without colon or a
    ///   malformed start line
    /// - [`HeadError::TooManyHeaderLines`] once the limit is exceeded, after
    ///   the connection has been disconnected
    /// - [`HeadError::Io`] when the connection fails
    pub fn read_header<C: Connection + ?Sized>(&mut self, connection: &mut C) -> Result<bool, HeadError> {
        HeaderDecoder.decode(connection, self)
    }

    /// Splits the stored start line into request or response parts.
    ///
    /// Parts belonging to the other kind of start line are cleared. A status
    /// code that is not a number in `100..=999` falls back to `200 OK`.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::HeaderFormat`] when the start line is empty or has
    /// fewer than three space separated tokens.
    pub fn parse_first_line(&mut self) -> Result<(), HeadError> {
        ensure!(!self.first_line.is_empty(), HeadError::header_format("HTTP header is empty"));

        let tokens: Vec<&str> = self.first_line.split(' ').collect();
        ensure!(tokens.len() >= 3, HeadError::header_format(format!("invalid HTTP header line \"{}\"", self.first_line)));

        if self.first_line.starts_with(HTTP_PREFIX) {
            let status = tokens[1].parse::<u16>().ok().and_then(|code| StatusCode::from_u16(code).ok());
            self.status = status.unwrap_or(StatusCode::OK);
            self.method = None;
            self.request_type = None;
            self.request_path = None;
            self.request_version = None;
        } else {
            let version = tokens[2].strip_prefix(HTTP_PREFIX).unwrap_or(tokens[2]);
            self.status = StatusCode::OK;
            self.method = tokens[0].parse().ok();
            self.request_type = Some(tokens[0].to_string());
            self.request_path = Some(tokens[1].to_string());
            self.request_version = Some(version.to_string());
        }

        Ok(())
    }

    pub fn first_line(&self) -> &str {
        &self.first_line
    }

    /// Replaces the start line verbatim; call [`HeaderBlock::parse_first_line`]
    /// to refresh the structured parts.
    pub fn set_first_line(&mut self, first_line: impl Into<String>) {
        self.first_line = first_line.into();
    }

    /// Builds `HTTP/{version} {code} {reason}` and records `code`.
    pub fn set_response_first_line(&mut self, version: &str, code: StatusCode) {
        self.first_line = format!("{HTTP_PREFIX}{version} {} {}", code.as_u16(), code.canonical_reason().unwrap_or_default());
        self.status = code;
        self.method = None;
        self.request_type = None;
        self.request_path = None;
        self.request_version = None;
    }

    /// Builds `{method} {path} HTTP/{version}` and records its parts.
    pub fn set_request_first_line(&mut self, version: &str, method: &str, path: &str) {
        self.first_line = format!("{method} {path} {HTTP_PREFIX}{version}");
        self.method = method.parse().ok();
        self.request_type = Some(method.to_string());
        self.request_path = Some(path.to_string());
        self.request_version = Some(version.to_string());
        self.status = StatusCode::OK;
    }

    /// Whether the start line is a status line.
    pub fn is_response(&self) -> bool {
        self.first_line.starts_with(HTTP_PREFIX)
    }

    /// The verb recognized from the first bytes of the connection.
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub(crate) fn set_method(&mut self, method: Option<Method>) {
        self.method = method;
    }

    /// The method token of the request line, as written.
    pub fn request_type(&self) -> Option<&str> {
        self.request_type.as_deref()
    }

    pub fn request_path(&self) -> Option<&str> {
        self.request_path.as_deref()
    }

    /// The bare request version, e.g. `1.1`.
    pub fn request_version(&self) -> Option<&str> {
        self.request_version.as_deref()
    }

    pub fn http_version(&self) -> Option<Version> {
        match self.request_version.as_deref()? {
            "0.9" => Some(Version::HTTP_09),
            "1.0" => Some(Version::HTTP_10),
            "1.1" => Some(Version::HTTP_11),
            "2" | "2.0" => Some(Version::HTTP_2),
            "3" | "3.0" => Some(Version::HTTP_3),
            _ => None,
        }
    }

    /// Response status, `200 OK` unless a status line said otherwise.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn limits(&self) -> HeaderLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: HeaderLimits) {
        self.limits = limits;
    }

    pub fn max_header_lines(&self) -> usize {
        self.limits.max_header_lines
    }

    pub fn set_max_header_lines(&mut self, max_header_lines: usize) {
        self.limits.max_header_lines = max_header_lines;
    }

    pub fn max_header_lines_enabled(&self) -> bool {
        self.limits.enabled
    }

    pub fn set_max_header_lines_enabled(&mut self, enabled: bool) {
        self.limits.enabled = enabled;
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn header(&self, name: &str) -> Option<&HeaderField> {
        self.fields.get(&name.to_ascii_lowercase())
    }

    pub fn header_mut(&mut self, name: &str) -> Option<&mut HeaderField> {
        self.fields.get_mut(&name.to_ascii_lowercase())
    }

    /// Header names in insertion order, original casing kept.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(HeaderField::name)
    }

    /// Header fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.values()
    }

    pub fn contains_header(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// The combined value of `name`, see [`HeaderField::value`].
    pub fn header_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.header(name).map(HeaderField::value)
    }

    /// Creates `name` or replaces all of its values with `value`.
    pub fn set_header_value(&mut self, name: &str, value: impl Into<String>) {
        match self.header_mut(name) {
            Some(field) => field.set_value(value),
            None => {
                self.fields.insert(name.to_ascii_lowercase(), HeaderField::new(name, value));
            }
        }
    }

    /// Adds `value` to `name`, creating the field when it is new, and returns
    /// the number of distinct names afterwards.
    pub fn append_header(&mut self, name: &str, value: impl Into<String>) -> usize {
        match self.header_mut(name) {
            Some(field) => field.add(value),
            None => {
                self.fields.insert(name.to_ascii_lowercase(), HeaderField::new(name, value));
            }
        }
        self.fields.len()
    }

    /// Removes `name` with all of its values, keeping the order of the rest.
    pub fn remove_header(&mut self, name: &str) -> Option<HeaderField> {
        self.fields.shift_remove(&name.to_ascii_lowercase())
    }

    pub fn content_type(&self) -> Option<Cow<'_, str>> {
        self.header_value(HEADER_CONTENT_TYPE)
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.set_header_value(HEADER_CONTENT_TYPE, content_type);
    }

    /// The content type parsed as a media type, `None` when absent or invalid.
    pub fn content_mime(&self) -> Option<Mime> {
        self.header(HEADER_CONTENT_TYPE)?.get(0).ok()?.parse().ok()
    }

    pub fn host(&self) -> Option<Cow<'_, str>> {
        self.header_value(HEADER_HOST)
    }

    /// Wire form: start line, every field, blank terminator, all CRLF delimited.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Writes the block to `connection` line by line.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::Io`] when the connection refuses a write.
    pub fn write_to<C: Connection + ?Sized>(&self, connection: &mut C) -> Result<(), HeadError> {
        HeaderEncoder.write_to(self, connection)
    }
}

impl fmt::Display for HeaderBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n", self.first_line)?;
        for field in self.fields.values() {
            write!(f, "{field}\r\n")?;
        }
        f.write_str("\r\n")
    }
}

/// Every value becomes its own entry, so repeated fields stay repeated.
impl TryFrom<&HeaderBlock> for HeaderMap {
    type Error = HeadError;

    fn try_from(block: &HeaderBlock) -> Result<Self, Self::Error> {
        let mut map = HeaderMap::with_capacity(block.len());
        for field in block.fields() {
            let name = HeaderName::from_bytes(field.name().as_bytes())
                .map_err(|e| HeadError::invalid_header_map(format!("name \"{}\": {e}", field.name())))?;
            for value in field.values() {
                let value = HeaderValue::from_str(value)
                    .map_err(|e| HeadError::invalid_header_map(format!("value of \"{}\": {e}", field.name())))?;
                map.append(name.clone(), value);
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut block = HeaderBlock::new();
        block.set_header_value("X-Foo", "1");

        assert_eq!(block.header_value("x-foo").unwrap(), "1");
        assert!(block.contains_header("X-FOO"));
        assert_eq!(block.names().collect::<Vec<_>>(), ["X-Foo"]);
    }

    #[test]
    fn set_header_value_replaces() {
        let mut block = HeaderBlock::new();
        block.append_header("Accept", "text/html");
        block.append_header("accept", "text/plain");
        assert_eq!(block.header_value("Accept").unwrap(), r#""text/html","text/plain""#);

        block.set_header_value("ACCEPT", "*/*");
        assert_eq!(block.len(), 1);
        assert_eq!(block.header_value("accept").unwrap(), "*/*");
        assert_eq!(block.header("accept").unwrap().name(), "Accept");
    }

    #[test]
    fn missing_header() {
        let block = HeaderBlock::new();
        assert!(block.is_empty());
        assert_eq!(block.header_value("Host"), None);
        assert_eq!(block.host(), None);
        assert_eq!(block.content_type(), None);
    }

    #[test]
    fn remove_keeps_order() {
        let mut block = HeaderBlock::new();
        block.set_header_value("A", "1");
        block.set_header_value("B", "2");
        block.set_header_value("C", "3");

        assert_eq!(block.remove_header("b").unwrap().value(), "2");
        assert_eq!(block.names().collect::<Vec<_>>(), ["A", "C"]);
        assert!(block.remove_header("b").is_none());
    }

    #[test]
    fn content_type_accessors() {
        let mut block = HeaderBlock::new();
        block.set_content_type("application/json; charset=utf-8");

        assert_eq!(block.content_type().unwrap(), "application/json; charset=utf-8");
        assert_eq!(block.header("content-type").unwrap().name(), "Content-Type");

        let mime = block.content_mime().unwrap();
        assert_eq!(mime.type_(), mime::APPLICATION);
        assert_eq!(mime.subtype(), mime::JSON);

        block.set_content_type("not a mime");
        assert_eq!(block.content_mime(), None);
    }

    #[test]
    fn parse_request_line() {
        let mut block = HeaderBlock::new();
        block.set_first_line("GET /index.html HTTP/1.1");
        block.parse_first_line().unwrap();

        assert_eq!(block.request_type(), Some("GET"));
        assert_eq!(block.request_path(), Some("/index.html"));
        assert_eq!(block.request_version(), Some("1.1"));
        assert_eq!(block.http_version(), Some(Version::HTTP_11));
        assert!(!block.is_response());
    }

    #[test]
    fn parse_request_line_keeps_odd_version() {
        let mut block = HeaderBlock::new();
        block.set_first_line("BREW /pot COFFEE/1.0");
        block.parse_first_line().unwrap();

        assert_eq!(block.request_type(), Some("BREW"));
        assert_eq!(block.request_version(), Some("COFFEE/1.0"));
        assert_eq!(block.http_version(), None);
    }

    #[test]
    fn parse_status_line() {
        let mut block = HeaderBlock::new();
        block.set_first_line("HTTP/1.1 404 Not Found");
        block.parse_first_line().unwrap();

        assert!(block.is_response());
        assert_eq!(block.status(), StatusCode::NOT_FOUND);
        assert_eq!(block.request_type(), None);
        assert_eq!(block.request_path(), None);
        assert_eq!(block.request_version(), None);
    }

    #[test]
    fn unparseable_status_falls_back_to_ok() {
        let mut block = HeaderBlock::new();
        block.set_first_line("HTTP/1.1 abc Whatever");
        block.parse_first_line().unwrap();
        assert_eq!(block.status(), StatusCode::OK);

        // numeric but outside 100..=999
        block.set_first_line("HTTP/1.1 42 Too Small");
        block.parse_first_line().unwrap();
        assert_eq!(block.status(), StatusCode::OK);
    }

    #[test]
    fn status_line_clears_request_parts() {
        let mut block = HeaderBlock::new();
        block.set_request_first_line("1.1", "GET", "/a");
        block.set_first_line("HTTP/1.1 404 Not Found");
        block.parse_first_line().unwrap();

        assert_eq!(block.status(), StatusCode::NOT_FOUND);
        assert_eq!(block.method(), None);
        assert_eq!(block.request_type(), None);
        assert_eq!(block.request_path(), None);
    }

    #[test]
    fn request_line_clears_status() {
        let mut block = HeaderBlock::new();
        block.set_response_first_line("1.1", StatusCode::NOT_FOUND);
        block.set_first_line("DELETE /a HTTP/1.1");
        block.parse_first_line().unwrap();

        assert_eq!(block.status(), StatusCode::OK);
        assert_eq!(block.method(), Some(Method::Delete));
        assert_eq!(block.request_path(), Some("/a"));
    }

    #[test]
    fn malformed_first_line() {
        let mut block = HeaderBlock::new();
        assert!(matches!(block.parse_first_line(), Err(HeadError::HeaderFormat { .. })));

        block.set_first_line("GET /");
        assert!(matches!(block.parse_first_line(), Err(HeadError::HeaderFormat { .. })));
    }

    #[test]
    fn build_response() {
        let mut block = HeaderBlock::new();
        block.set_response_first_line("1.1", StatusCode::NOT_FOUND);
        block.set_content_type("text/plain");
        block.append_header("Set-Cookie", "a");
        block.append_header("Set-Cookie", "b");

        assert_eq!(block.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            block.render(),
            "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nSet-Cookie: a\r\nSet-Cookie: b\r\n\r\n"
        );
    }

    #[test]
    fn build_request() {
        let mut block = HeaderBlock::new();
        block.set_request_first_line("1.0", "POST", "/submit");
        block.set_header_value("Host", "example.com");

        assert_eq!(block.first_line(), "POST /submit HTTP/1.0");
        assert_eq!(block.method(), Some(Method::Post));
        assert_eq!(block.request_path(), Some("/submit"));
        assert_eq!(block.host().unwrap(), "example.com");
        assert_eq!(block.render(), "POST /submit HTTP/1.0\r\nHost: example.com\r\n\r\n");
    }

    #[test]
    fn limit_setters() {
        let mut block = HeaderBlock::with_limits(HeaderLimits::new(10));
        assert_eq!(block.max_header_lines(), 10);
        assert!(block.max_header_lines_enabled());

        block.set_max_header_lines(20);
        block.set_max_header_lines_enabled(false);
        assert_eq!(block.limits(), HeaderLimits { max_header_lines: 20, enabled: false });
    }

    #[test]
    fn into_header_map() {
        let mut block = HeaderBlock::new();
        block.set_header_value("Host", "example.com");
        block.append_header("Set-Cookie", "a=1");
        block.append_header("Set-Cookie", "b=2");

        let map = HeaderMap::try_from(&block).unwrap();
        assert_eq!(map.get(http::header::HOST).unwrap(), "example.com");
        assert_eq!(map.get_all(http::header::SET_COOKIE).iter().collect::<Vec<_>>(), ["a=1", "b=2"]);

        block.set_header_value("Bad Name", "x");
        assert!(matches!(HeaderMap::try_from(&block), Err(HeadError::InvalidHeaderMap { .. })));
    }
}
