//! Accepts connections one at a time and logs each parsed request.

use httpfromtcp::config::Config;
use httpfromtcp::http::parser::request_from_reader;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    loop {
        let (mut socket, peer) = listener.accept().await?;
        info!("Connection opened from {}", peer);

        let request = match request_from_reader(&mut socket).await {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to read request from {}: {}", peer, e);
                continue;
            }
        };

        let line = &request.request_line;
        info!(method = %line.method, target = %line.target, version = %line.version, "Request line");
        for (name, value) in request.headers.iter() {
            info!("Header {}: {}", name, value);
        }
        info!("Body: {}", String::from_utf8_lossy(&request.body));

        info!("Connection closed from {}", peer);
    }
}
