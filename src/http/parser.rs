use std::io;

use bytes::{Buf, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::headers::{find_crlf, CRLF};
use crate::http::request::{Request, RequestLine};

/// Initial size of the receive buffer; it doubles whenever it fills up.
pub const INITIAL_BUFFER_SIZE: usize = 8;

const SUPPORTED_VERSION: &str = "1.1";

/// Everything that can go wrong while turning bytes into a [`Request`].
///
/// The `Display` text is what the server sends back to a client whose
/// request could not be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed header line")]
    MalformedHeader,

    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid value for header {0:?}")]
    InvalidHeaderValue(String),

    #[error("malformed request line")]
    MalformedRequestLine,

    #[error("invalid method {0:?}")]
    InvalidMethod(String),

    #[error("invalid request target")]
    InvalidTarget,

    #[error("invalid http version {0:?}")]
    InvalidVersion(String),

    #[error("invalid content-length {0:?}")]
    InvalidContentLength(String),

    #[error("body longer than content-length: expected {expected} bytes, got {actual}")]
    BodyOverflow { expected: usize, actual: usize },

    #[error("body shorter than content-length: expected {expected} bytes, got {actual}")]
    TruncatedBody { expected: usize, actual: usize },

    #[error("connection closed before the request head was complete")]
    UnexpectedEof,

    #[error("trying to read data in a done state")]
    AlreadyComplete,

    #[error("invalid chunk: {0}")]
    InvalidChunk(&'static str),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Parses a request line from the front of `data`.
///
/// Returns `Ok(None)` until a full line terminated by CRLF is buffered,
/// otherwise the line and the number of bytes it occupied including the CRLF.
pub fn parse_request_line(data: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let line_end = match find_crlf(data) {
        Some(idx) => idx,
        None => return Ok(None),
    };

    let line =
        std::str::from_utf8(&data[..line_end]).map_err(|_| ParseError::MalformedRequestLine)?;

    let parts: Vec<&str> = line.split(' ').collect();
    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::MalformedRequestLine);
    };

    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ParseError::InvalidMethod(method.to_string()));
    }

    if target.is_empty() {
        return Err(ParseError::InvalidTarget);
    }

    match version.split_once('/') {
        Some(("HTTP", SUPPORTED_VERSION)) => {}
        _ => return Err(ParseError::InvalidVersion(version.to_string())),
    }

    let request_line = RequestLine {
        method: method.to_string(),
        target: target.to_string(),
        version: SUPPORTED_VERSION.to_string(),
    };

    Ok(Some((request_line, line_end + CRLF.len())))
}

/// Reads one request from `reader`, however the bytes happen to be split
/// across reads.
///
/// Unconsumed bytes are kept at the front of a buffer that starts at
/// [`INITIAL_BUFFER_SIZE`] bytes and doubles each time it fills.
/// Hitting end-of-stream in the middle of the request line or headers yields
/// [`ParseError::UnexpectedEof`]; a body shorter than its declared
/// `content-length` yields [`ParseError::TruncatedBody`].
pub async fn request_from_reader<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(INITIAL_BUFFER_SIZE);
    let mut request = Request::new();

    while !request.is_done() {
        if buf.len() == buf.capacity() {
            let grow_by = buf.capacity().max(INITIAL_BUFFER_SIZE);
            buf.reserve(grow_by);
        }

        let n = reader.read_buf(&mut buf).await?;
        if n == 0 {
            if !request.head_complete() {
                return Err(ParseError::UnexpectedEof);
            }
            request.finish();
            break;
        }

        let consumed = request.parse(&buf)?;
        buf.advance(consumed);
    }

    if let Some(expected) = request.content_length()? {
        if request.body.len() != expected {
            return Err(ParseError::TruncatedBody {
                expected,
                actual: request.body.len(),
            });
        }
    }

    Ok(request)
}
