use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::http::parser::request_from_reader;
use crate::http::request::Request;
use crate::http::response::{HandlerError, StatusCode};
use crate::http::writer::{BoxedSink, ResponseWriter};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Application code that answers a parsed request.
///
/// The handler must write a complete response through the writer before its
/// future resolves. It is called exactly once per successfully parsed
/// request and never for a request that failed to parse.
pub trait Handler: Send + Sync + 'static {
    fn handle<'a>(
        &'a self,
        writer: &'a mut ResponseWriter<BoxedSink>,
        request: &'a Request,
    ) -> BoxFuture<'a, ()>;
}

/// One accepted client connection, served exactly once and then closed.
pub struct Connection<S> {
    stream: S,
    handler: Arc<dyn Handler>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(stream: S, handler: Arc<dyn Handler>) -> Self {
        Self { stream, handler }
    }

    /// Reads one request, answers it, and shuts the stream down.
    ///
    /// A request that fails to parse is answered with a plain
    /// `500 <error>` reply and the handler is not invoked. Errors returned
    /// here are transport errors on the reply path.
    pub async fn run(self) -> anyhow::Result<()> {
        let (mut reader, mut sink) = tokio::io::split(self.stream);

        let request = match request_from_reader(&mut reader).await {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                let reply = HandlerError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
                reply.write_to(&mut sink).await?;
                sink.shutdown().await?;
                return Ok(());
            }
        };

        debug!(
            method = %request.request_line.method,
            target = %request.request_line.target,
            body_len = request.body.len(),
            "Request parsed"
        );

        let mut writer = ResponseWriter::new(Box::new(sink) as BoxedSink);
        self.handler.handle(&mut writer, &request).await;
        writer.finish().await?;

        let mut sink = writer.into_inner();
        sink.shutdown().await?;

        Ok(())
    }
}
