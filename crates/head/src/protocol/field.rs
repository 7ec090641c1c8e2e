//! A single logical header: one name with one or more values.
//!
//! Repeated header lines such as `Set-Cookie` are merged into the same
//! [`HeaderField`], keeping the values in the order they arrived so the block
//! renders back exactly as it was received.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::protocol::HeadError;

/// A header name together with its ordered values. Never holds zero values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: String,
    values: Vec<String>,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), values: vec![value.into()] }
    }

    /// Builds a field from a raw `Name: Value` line.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::HeaderFormat`] when the line has no colon.
    pub fn parse(line: &str) -> Result<Self, HeadError> {
        let (name, value) = split_header_line(line)?;
        Ok(Self::new(name, value))
    }

    /// The name as it was received or set, original casing kept.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values carried by this field, always at least one.
    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn add(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::ValueIndexOutOfRange`] when `index >= count()`.
    pub fn get(&self, index: usize) -> Result<&str, HeadError> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| HeadError::value_index_out_of_range(index, self.values.len()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// The combined value of this field.
    ///
    /// A single value is returned verbatim. Several values are each wrapped in
    /// double quotes and joined with commas: `"a","b"`.
    pub fn value(&self) -> Cow<'_, str> {
        if let [single] = self.values.as_slice() {
            return Cow::Borrowed(single);
        }

        let quoted: Vec<String> = self.values.iter().map(|value| format!("\"{value}\"")).collect();
        Cow::Owned(quoted.join(","))
    }

    /// Replaces every value with `value`.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.values.clear();
        self.values.push(value.into());
    }

    /// Wire form: one `Name: Value` line per value, joined by CRLF, without a
    /// trailing line break.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str("\r\n")?;
            }
            write!(f, "{}: {}", self.name, value)?;
        }
        Ok(())
    }
}

impl FromStr for HeaderField {
    type Err = HeadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Splits a header line at its first colon.
///
/// A single space after the colon is skipped when present; peers that omit it
/// are accepted and the value then starts right after the colon.
pub(crate) fn split_header_line(line: &str) -> Result<(&str, &str), HeadError> {
    let Some((name, rest)) = line.split_once(':') else {
        return Err(HeadError::header_format(format!("invalid HTTP header line \"{line}\"")));
    };

    Ok((name, rest.strip_prefix(' ').unwrap_or(rest)))
}
