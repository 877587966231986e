use std::collections::HashMap;

use crate::http::parser::ParseError;

pub(crate) const CRLF: &[u8] = b"\r\n";

/// Header block of a request, response, or chunked trailer section.
///
/// Names are stored lower-cased, so every lookup is case-insensitive.
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one header line from the front of `data`.
    ///
    /// Returns `(consumed, done)`:
    ///
    /// * `(0, false)` when no complete line is buffered yet,
    /// * `(2, true)` when `data` starts with the blank line ending the block,
    /// * `(line_len + 2, false)` after committing one header.
    ///
    /// Nothing is committed when an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpfromtcp::http::headers::Headers;
    /// let mut headers = Headers::new();
    /// let (n, done) = headers.parse_line(b"Host: localhost:42069\r\n\r\n").unwrap();
    /// assert_eq!((n, done), (23, false));
    /// assert_eq!(headers.get("HOST"), Some("localhost:42069"));
    /// ```
    pub fn parse_line(&mut self, data: &[u8]) -> Result<(usize, bool), ParseError> {
        let line_end = match find_crlf(data) {
            Some(idx) => idx,
            None => return Ok((0, false)),
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = std::str::from_utf8(&data[..line_end]).map_err(|_| ParseError::MalformedHeader)?;

        // Whitespace between the name and the colon is not trimmed away and
        // fails the name check below.
        let (name, value) = line
            .trim()
            .split_once(':')
            .ok_or(ParseError::MalformedHeader)?;

        let name = name.to_ascii_lowercase();
        if !is_valid_name(&name) {
            return Err(ParseError::InvalidHeaderName(name));
        }

        // Narrow guard against folded or otherwise mangled values; values
        // with more than one space are refused outright.
        if value.matches(' ').count() > 1 {
            return Err(ParseError::InvalidHeaderValue(name));
        }

        self.append(name, value.trim());

        Ok((line_end + CRLF.len(), false))
    }

    /// Adds a value, merging with an existing one as `"old, new"`.
    ///
    /// Writing the value already stored is a no-op.
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.map.get_mut(&name) {
            Some(existing) if *existing == value => {}
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => {
                self.map.insert(name, value);
            }
        }
    }

    /// Sets a header, replacing any previous value.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.map
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates `(lower-cased name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

/// RFC 7230 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_token_byte)
}
