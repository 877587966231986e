//! Decoding of a complete chunked transfer-coded body.

use crate::http::headers::{find_crlf, Headers, CRLF};
use crate::http::parser::ParseError;

/// Decodes `data` as a chunked body and returns the payload together with
/// any trailer fields.
///
/// `data` must hold the whole body: every chunk, the zero-size last chunk,
/// the trailer section and its closing blank line. Chunk extensions
/// (`;name=value` after the size) are accepted and ignored.
pub fn decode_chunked(data: &[u8]) -> Result<(Vec<u8>, Headers), ParseError> {
    let mut body = Vec::new();
    let mut pos = 0;

    loop {
        let rest = &data[pos..];
        let line_end = find_crlf(rest).ok_or(ParseError::InvalidChunk("missing size line"))?;
        let size = parse_chunk_size(&rest[..line_end])?;
        pos += line_end + CRLF.len();

        if size == 0 {
            break;
        }

        let chunk_end = pos
            .checked_add(size)
            .filter(|end| end + CRLF.len() <= data.len())
            .ok_or(ParseError::InvalidChunk("chunk shorter than its size"))?;

        body.extend_from_slice(&data[pos..chunk_end]);
        if &data[chunk_end..chunk_end + CRLF.len()] != CRLF {
            return Err(ParseError::InvalidChunk("missing CRLF after chunk data"));
        }
        pos = chunk_end + CRLF.len();
    }

    let mut trailers = Headers::new();
    loop {
        let (consumed, done) = trailers.parse_line(&data[pos..])?;
        if consumed == 0 {
            return Err(ParseError::InvalidChunk("unterminated trailer section"));
        }
        pos += consumed;
        if done {
            break;
        }
    }

    Ok((body, trailers))
}

fn parse_chunk_size(line: &[u8]) -> Result<usize, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidChunk("size is not ascii"))?;
    let digits = line.split(';').next().unwrap_or("").trim();
    if digits.is_empty() {
        return Err(ParseError::InvalidChunk("empty chunk size"));
    }
    usize::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidChunk("chunk size is not hex"))
}
