//! Uploading a [`SequencedBody`] to the probe server.

use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{Request, StatusCode};
use http_body_util::{Either, Full};
use probe_http::body::{SourceBody, read_to_end};
use probe_http::connection::ClientConnection;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, info};

use crate::classify::Classification;
use crate::config::ClientConfig;
use crate::error::{ClientError, TlsError};
use crate::pattern::{CLASSIFICATION_HEADER, UPLOAD_PATH};
use crate::source::SequencedBody;
use crate::tls::insecure_client_config;

/// How the client hands the body to the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    /// Pull `write_buffer_size` bytes at a time and send each pull as it
    /// happens.
    Streaming { write_buffer_size: usize },
    /// Read the whole body first, then send it in one piece.
    Buffered,
}

impl From<&ClientConfig> for UploadMode {
    fn from(config: &ClientConfig) -> Self {
        if config.buffered {
            UploadMode::Buffered
        } else {
            UploadMode::Streaming { write_buffer_size: config.write_buffer_size }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    pub status: StatusCode,
    /// The server's verdict, when it reported one.
    pub classification: Option<Classification>,
}

/// POSTs a fresh [`SequencedBody`] to `/upload` over `stream`.
///
/// `authority` is sent as the `Host` header. Any response status is returned
/// as is; only failures to complete the exchange are errors.
pub async fn upload<S>(stream: S, authority: &str, mode: UploadMode) -> Result<UploadOutcome, ClientError>
where
    S: AsyncRead + AsyncWrite,
{
    let body = match mode {
        UploadMode::Streaming { write_buffer_size } => Either::Left(SourceBody::new(SequencedBody::new(), write_buffer_size)),
        UploadMode::Buffered => {
            let bytes = read_to_end(&mut SequencedBody::new()).map_err(ClientError::request_creation)?;
            Either::Right(Full::new(bytes))
        }
    };
    debug!(?mode, authority, "uploading");

    let request = Request::post(format!("https://{authority}{UPLOAD_PATH}"))
        .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
        .body(body)
        .map_err(ClientError::request_creation)?;

    let (reader, writer) = tokio::io::split(stream);
    let mut connection = ClientConnection::new(reader, writer);
    let response = connection.send(request).await?;
    if let Err(e) = connection.shutdown().await {
        debug!(cause = %e, "can't shut down the connection");
    }

    let classification = response
        .headers()
        .get(CLASSIFICATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());

    Ok(UploadOutcome { status: response.status(), classification })
}

/// One upload run against the server named in a [`ClientConfig`].
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    tls_config: Arc<rustls::ClientConfig>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, TlsError> {
        Ok(Self { config, tls_config: insecure_client_config()? })
    }

    /// Connects, uploads once and fails unless the server answered `200 OK`.
    pub async fn run(&self) -> Result<UploadOutcome, ClientError> {
        let authority = self.config.authority();

        let tcp_stream = TcpStream::connect((self.config.hostname.as_str(), self.config.port))
            .await
            .map_err(|e| ClientError::request_creation(format!("can't connect to {authority}: {e}")))?;
        let server_name = ServerName::try_from(self.config.hostname.clone()).map_err(ClientError::request_creation)?;
        let tls_stream = TlsConnector::from(Arc::clone(&self.tls_config))
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| ClientError::request_creation(format!("tls handshake with {authority} failed: {e}")))?;
        info!(%authority, "connected");

        let outcome = upload(tls_stream, &authority, UploadMode::from(&self.config)).await?;
        if outcome.status != StatusCode::OK {
            return Err(ClientError::ServerStatus(outcome.status));
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::CHUNK_SIZE_HINT;

    fn config(buffered: bool) -> ClientConfig {
        ClientConfig {
            hostname: "localhost".to_string(),
            port: 5002,
            write_buffer_size: CHUNK_SIZE_HINT,
            buffered,
            log_level: tracing::Level::INFO,
        }
    }

    #[test]
    fn mode_from_config() {
        assert_eq!(UploadMode::from(&config(false)), UploadMode::Streaming { write_buffer_size: 4 });
        assert_eq!(UploadMode::from(&config(true)), UploadMode::Buffered);
    }

    #[tokio::test]
    async fn unreachable_server_is_request_creation_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = Client::new(ClientConfig { hostname: "127.0.0.1".to_string(), port, ..config(false) }).unwrap();
        assert!(matches!(client.run().await, Err(ClientError::RequestCreation { .. })));
    }
}
