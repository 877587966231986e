//! httpfromtcp - HTTP/1.1 straight off a TCP socket
//!
//! Incremental request parsing, response serialization (fixed and chunked)
//! and a one-task-per-connection server.

pub mod config;
pub mod http;
pub mod server;

pub use http::connection::{BoxFuture, Handler};
pub use http::headers::Headers;
pub use http::request::Request;
pub use http::response::StatusCode;
pub use http::writer::{BoxedSink, ResponseWriter};
pub use server::listener::Server;
