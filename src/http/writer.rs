use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::headers::Headers;
use crate::http::response::StatusCode;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Type-erased connection sink handed to request handlers.
pub type BoxedSink = Box<dyn AsyncWrite + Send + Unpin>;

/// Serializes one response onto `sink`.
///
/// Callers drive it in wire order: status line, headers, then either
/// [`write_body`](Self::write_body) or a run of chunks closed by
/// [`write_chunked_body_done`](Self::write_chunked_body_done) and, when a
/// `Trailer` header was sent, [`write_trailers`](Self::write_trailers).
/// The order is not checked.
pub struct ResponseWriter<W> {
    sink: W,
    trailer_declared: bool,
    trailer_section_open: bool,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            trailer_declared: false,
            trailer_section_open: false,
        }
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    ///
    /// Codes without a known reason phrase are written as `<code> ` with
    /// an empty reason.
    pub async fn write_status_line(&mut self, status: StatusCode) -> std::io::Result<()> {
        let line = format!(
            "{} {} {}\r\n",
            HTTP_VERSION,
            status.as_u16(),
            status.reason_phrase().unwrap_or("")
        );
        self.sink.write_all(line.as_bytes()).await
    }

    /// Writes each header followed by the blank line ending the block.
    pub async fn write_headers(&mut self, headers: &Headers) -> std::io::Result<()> {
        if headers.contains("trailer") {
            self.trailer_declared = true;
        }

        let mut buf = serialize_fields(headers);
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await
    }

    /// Writes a fixed body verbatim. The caller sends a matching
    /// `Content-Length`.
    pub async fn write_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        self.sink.write_all(body).await?;
        self.sink.flush().await
    }

    /// Writes one chunk: hex size, CRLF, data, CRLF.
    ///
    /// An empty slice writes nothing, since a zero-size chunk would end the
    /// body.
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> std::io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let mut buf = Vec::with_capacity(data.len() + 12);
        buf.extend_from_slice(format!("{:X}\r\n", data.len()).as_bytes());
        buf.extend_from_slice(data);
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await?;
        self.sink.flush().await
    }

    /// Writes the zero-size last chunk.
    ///
    /// Without a declared `Trailer` header this emits `0\r\n\r\n` and the
    /// body is complete. With one, only `0\r\n` is written and the trailer
    /// section, including its closing blank line, comes from
    /// [`write_trailers`](Self::write_trailers). If no trailers follow,
    /// [`finish`](Self::finish) closes the section instead.
    pub async fn write_chunked_body_done(&mut self) -> std::io::Result<()> {
        let terminator: &[u8] = if self.trailer_declared {
            self.trailer_section_open = true;
            b"0\r\n"
        } else {
            b"0\r\n\r\n"
        };
        self.sink.write_all(terminator).await?;
        self.sink.flush().await
    }

    /// Writes trailer fields after the last chunk, serialized like headers.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> std::io::Result<()> {
        self.trailer_section_open = false;
        let mut buf = serialize_fields(trailers);
        buf.extend_from_slice(b"\r\n");
        self.sink.write_all(&buf).await?;
        self.sink.flush().await
    }

    /// Ends a trailer section that was opened by the last chunk but never
    /// written, then flushes.
    pub async fn finish(&mut self) -> std::io::Result<()> {
        if self.trailer_section_open {
            self.trailer_section_open = false;
            self.sink.write_all(b"\r\n").await?;
        }
        self.sink.flush().await
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn serialize_fields(fields: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();
    for (name, value) in fields.iter() {
        buf.extend_from_slice(canonical_name(name).as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

/// `content-type` -> `Content-Type`
fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}
