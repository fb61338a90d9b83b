//! Startup configuration for the two binaries.
//!
//! Both structs derive [`clap::Args`] so the binaries can flatten them into
//! their command line; library callers build them directly.

use std::path::PathBuf;

use clap::Args;
use tracing::Level;

use crate::pattern::{CHUNK_SIZE_HINT, DEFAULT_PORT};

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind to.
    #[arg(long, default_value = "localhost")]
    pub addr: String,

    /// Port to listen on for upload measurements.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// PEM encoded certificate chain.
    #[arg(long, default_value = "cert.pem")]
    pub cert: PathBuf,

    /// PEM encoded private key.
    #[arg(long, default_value = "key.pem")]
    pub key: PathBuf,

    /// Maximum level of log events to print.
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Hostname of the server to upload to.
    #[arg(long, default_value = "localhost")]
    pub hostname: String,

    /// Port of the server to upload to.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Bytes requested from the body per write when streaming.
    #[arg(long, default_value_t = CHUNK_SIZE_HINT)]
    pub write_buffer_size: usize,

    /// Read the whole body before sending it instead of streaming it.
    #[arg(long)]
    pub buffered: bool,

    /// Maximum level of log events to print.
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl ClientConfig {
    /// `host:port`, as it goes into the `Host` header.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}
