use std::sync::Arc;

use httpfromtcp::config::Config;
use httpfromtcp::http::headers::Headers;
use httpfromtcp::http::response::default_headers;
use httpfromtcp::{BoxFuture, BoxedSink, Handler, Request, ResponseWriter, Server, StatusCode};

const BAD_REQUEST_PAGE: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>";

const SERVER_ERROR_PAGE: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>";

const OK_PAGE: &str = "<html>
  <head>
    <title>200 OK</title>
  </head>
  <body>
    <h1>Success!</h1>
    <p>Your request was an absolute banger.</p>
  </body>
</html>";

struct DemoHandler;

impl Handler for DemoHandler {
    fn handle<'a>(
        &'a self,
        w: &'a mut ResponseWriter<BoxedSink>,
        req: &'a Request,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let target = req.request_line.target.as_str();
            let result = match target.strip_prefix("/chunked/") {
                Some(count) => stream_chunks(w, count.parse().unwrap_or(1)).await,
                None => {
                    let (status, page) = match target {
                        "/yourproblem" => (StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE),
                        "/myproblem" => (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_PAGE),
                        _ => (StatusCode::OK, OK_PAGE),
                    };
                    write_page(w, status, page).await
                }
            };

            if let Err(e) = result {
                tracing::error!("Failed to write response for {}: {}", target, e);
            }
        })
    }
}

async fn write_page(
    w: &mut ResponseWriter<BoxedSink>,
    status: StatusCode,
    page: &str,
) -> std::io::Result<()> {
    let mut headers = default_headers(page.len());
    headers.set("Content-Type", "text/html");

    w.write_status_line(status).await?;
    w.write_headers(&headers).await?;
    w.write_body(page.as_bytes()).await
}

async fn stream_chunks(w: &mut ResponseWriter<BoxedSink>, count: usize) -> std::io::Result<()> {
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-Length");

    w.write_status_line(StatusCode::OK).await?;
    w.write_headers(&headers).await?;

    let mut sent = 0;
    for i in 0..count {
        let chunk = format!("chunk {}\n", i);
        sent += chunk.len();
        w.write_chunked_body(chunk.as_bytes()).await?;
    }
    w.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.set("X-Content-Length", sent.to_string());
    w.write_trailers(&trailers).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = match std::env::var("HTTPFROMTCP_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::load(),
    };

    let server = Server::start(&cfg.listen_addr, Arc::new(DemoHandler)).await?;
    tracing::info!("Server started on port {}", server.port());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.stop().await;

    Ok(())
}
