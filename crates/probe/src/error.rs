use std::io;
use std::path::PathBuf;

use http::StatusCode;
use probe_http::protocol::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsError {
    #[error("can't read {path}: {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("invalid pem data: {source}")]
    Pem { source: io::Error },

    #[error("no certificate found in pem data")]
    NoCertificate,

    #[error("no private key found in pem data")]
    NoPrivateKey,

    #[error("tls configuration rejected: {source}")]
    Config {
        #[from]
        source: rustls::Error,
    },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("can't bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("invalid route: {source}")]
    Route {
        #[from]
        source: matchit::InsertError,
    },
}

/// Failures of one upload attempt. None of them are retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response: name resolution, connect, TLS
    /// handshake, or the HTTP exchange itself failed.
    #[error("request creation failed: {reason}")]
    RequestCreation { reason: String },

    #[error("server responded with {0}")]
    ServerStatus(StatusCode),
}

impl ClientError {
    pub fn request_creation<S: ToString>(str: S) -> Self {
        Self::RequestCreation { reason: str.to_string() }
    }
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        Self::request_creation(e)
    }
}
