//! HTTP/1.1 wire protocol.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive header map and its single-line parser
//! - **`parser`**: error taxonomy, request-line parsing and the stream driver
//! - **`request`**: the request type and its resumable parse state machine
//! - **`response`**: status codes, default headers, bare error replies
//! - **`writer`**: serializes a response, fixed or chunked, onto a sink
//! - **`chunked`**: decodes a complete chunked body
//! - **`connection`**: serves a single accepted connection
//!
//! # Request parsing
//!
//! Bytes arrive in whatever pieces the socket hands out. The driver keeps
//! the unconsumed tail in a growing buffer and offers it to the request on
//! every read:
//!
//! ```text
//!        ┌─────────────────┐
//!        │   Initialized   │ ← waiting for `METHOD SP target SP HTTP/1.1 CRLF`
//!        └────────┬────────┘
//!                 │ request line parsed
//!                 ▼
//!        ┌─────────────────┐
//!        │ ParsingHeaders  │ ← one `Name: value CRLF` per step
//!        └────────┬────────┘
//!                 │ blank line
//!                 ├─ no content-length → Done
//!                 ▼
//!        ┌─────────────────┐
//!        │   ParsingBody   │ ← absorbs everything offered
//!        └────────┬────────┘
//!                 │ body length == content-length
//!                 ▼
//!        ┌─────────────────┐
//!        │      Done       │
//!        └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use httpfromtcp::http::parser::request_from_reader;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:42069").await?;
//!     let (mut socket, _addr) = listener.accept().await?;
//!     let request = request_from_reader(&mut socket).await?;
//!     println!("{} {}", request.request_line.method, request.request_line.target);
//!     Ok(())
//! }
//! ```

pub mod chunked;
pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
