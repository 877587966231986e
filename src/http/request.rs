use crate::http::headers::Headers;
use crate::http::parser::{parse_request_line, ParseError};

/// The first line of a request, e.g. `GET /index.html HTTP/1.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    /// Upper-case method token (`GET`, `POST`, ...)
    pub method: String,
    /// Request target exactly as sent (`/`, `/search?q=rust`, ...)
    pub target: String,
    /// Version number without the `HTTP/` prefix; always `"1.1"`
    pub version: String,
}

/// Progress of a [`Request`] through the parser. States only move forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    #[default]
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

/// An HTTP/1.1 request, built up incrementally by [`Request::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub request_line: RequestLine,
    pub headers: Headers,
    pub body: Vec<u8>,
    state: ParseState,
}

impl Request {
    /// Creates an empty request in [`ParseState::Initialized`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// True once the blank line ending the header block has been consumed.
    pub fn head_complete(&self) -> bool {
        matches!(self.state, ParseState::ParsingBody | ParseState::Done)
    }

    /// Marks the request as complete regardless of its current state.
    ///
    /// Used by the stream driver when the peer closes its side.
    pub(crate) fn finish(&mut self) {
        self.state = ParseState::Done;
    }

    /// Retrieves a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// The declared `content-length`, if any.
    pub fn content_length(&self) -> Result<Option<usize>, ParseError> {
        self.headers
            .get("content-length")
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))
            })
            .transpose()
    }

    /// Feeds as much of `data` as possible through the state machine.
    ///
    /// Stops once the request is done or when a step needs more bytes than
    /// `data` holds. Returns the number of bytes consumed; the caller keeps
    /// the rest and offers it again together with the next read.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        let mut total = 0;

        while !self.is_done() {
            let n = self.parse_step(&data[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }

        Ok(total)
    }

    /// Performs a single state transition's worth of parsing.
    ///
    /// A return value of 0 means more bytes are needed, except in
    /// `ParsingBody` without a `content-length`, which moves straight to
    /// `Done`.
    pub fn parse_step(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Initialized => match parse_request_line(data)? {
                None => Ok(0),
                Some((request_line, consumed)) => {
                    self.request_line = request_line;
                    self.state = ParseState::ParsingHeaders;
                    Ok(consumed)
                }
            },

            ParseState::ParsingHeaders => {
                let (consumed, done) = self.headers.parse_line(data)?;
                if done {
                    self.state = if self.headers.contains("content-length") {
                        ParseState::ParsingBody
                    } else {
                        ParseState::Done
                    };
                }
                Ok(consumed)
            }

            ParseState::ParsingBody => {
                let expected = match self.content_length()? {
                    Some(len) => len,
                    None => {
                        self.state = ParseState::Done;
                        return Ok(0);
                    }
                };

                self.body.extend_from_slice(data);

                if self.body.len() > expected {
                    return Err(ParseError::BodyOverflow {
                        expected,
                        actual: self.body.len(),
                    });
                }
                if self.body.len() == expected {
                    self.state = ParseState::Done;
                }

                Ok(data.len())
            }

            ParseState::Done => Err(ParseError::AlreadyComplete),
        }
    }
}
