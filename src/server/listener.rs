use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::http::connection::{Connection, Handler};

/// Pause after a failed accept so persistent errors (e.g. EMFILE) don't spin.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// A running server: one background accept loop, one task per connection.
pub struct Server {
    local_addr: SocketAddr,
    listening: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: Option<JoinHandle<()>>,
}

impl Server {
    /// Binds `addr` and starts accepting connections in the background.
    ///
    /// Every accepted connection is served on its own task; there is no
    /// upper bound on how many run at once.
    pub async fn start(addr: &str, handler: Arc<dyn Handler>) -> Result<Server, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        info!("Listening on {}", local_addr);

        let listening = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());

        let accept_task = tokio::spawn(accept_loop(
            listener,
            handler,
            listening.clone(),
            shutdown.clone(),
        ));

        Ok(Server {
            local_addr,
            listening,
            shutdown,
            accept_task: Some(accept_task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }

    /// Stops accepting and closes the listening socket.
    ///
    /// Connections already accepted keep running until they finish.
    pub async fn stop(mut self) {
        self.listening.store(false, Ordering::Release);
        self.shutdown.notify_one();

        if let Some(task) = self.accept_task.take() {
            if let Err(e) = task.await {
                error!("Accept loop ended abnormally: {}", e);
            }
        }
        info!("Stopped listening on {}", self.local_addr);
    }
}

impl Drop for Server {
    /// A server dropped without `stop()` still releases its port.
    fn drop(&mut self) {
        if let Some(task) = self.accept_task.take() {
            self.listening.store(false, Ordering::Release);
            self.shutdown.notify_one();
            task.abort();
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    handler: Arc<dyn Handler>,
    listening: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
) {
    loop {
        let accepted = tokio::select! {
            res = listener.accept() => res,
            _ = shutdown.notified() => return,
        };

        if !listening.load(Ordering::Acquire) {
            return;
        }

        let (socket, peer) = match accepted {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let handler = handler.clone();
        tokio::spawn(async move {
            let conn = Connection::new(socket, handler);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
