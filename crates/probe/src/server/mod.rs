//! The upload server: TLS over TCP, one task per connection.

mod handler;

use std::io;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;

use probe_http::connection::HttpConnection;
use probe_http::protocol::HttpError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

pub use handler::UploadHandler;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::tls::TlsSettings;

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    tls: TlsSettings,
    handler: Arc<UploadHandler>,
}

impl Server {
    pub async fn bind(config: &ServerConfig, tls: &TlsSettings) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr).await.map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;
        Ok(Self { listener, tls: tls.clone(), handler: Arc::new(UploadHandler::new()?) })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` completes, then waits for the
    /// connections still being served to finish.
    pub async fn run<F: Future<Output = ()>>(self, shutdown: F) {
        let mut shutdown = pin!(shutdown);
        let acceptor = self.tls.acceptor();
        let mut connections = JoinSet::new();

        loop {
            let (tcp_stream, remote_addr) = tokio::select! {
                () = &mut shutdown => {
                    info!(in_flight = connections.len(), "stop accepting connections");
                    break;
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => continue,
                accepted = self.listener.accept() => match accepted {
                    Ok(stream_and_addr) => stream_and_addr,
                    Err(e) => {
                        warn!(cause = %e, "failed to accept");
                        continue;
                    }
                },
            };

            let acceptor = acceptor.clone();
            let handler = Arc::clone(&self.handler);

            connections.spawn(async move {
                let tls_stream = match acceptor.accept(tcp_stream).await {
                    Ok(tls_stream) => tls_stream,
                    Err(e) => {
                        warn!(cause = %e, %remote_addr, "tls handshake failed");
                        return;
                    }
                };

                match serve_connection(tls_stream, &handler).await {
                    Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                    Err(e) => error!(cause = %e, %remote_addr, "service has error, connection shutdown"),
                }
            });
        }

        while connections.join_next().await.is_some() {}
        info!("all connections finished");
    }
}

/// Serves HTTP requests on an established stream until the peer is done.
pub async fn serve_connection<S>(stream: S, handler: &UploadHandler) -> Result<(), HttpError>
where
    S: AsyncRead + AsyncWrite,
{
    let (reader, writer) = tokio::io::split(stream);
    HttpConnection::new(reader, writer).process(handler).await
}
