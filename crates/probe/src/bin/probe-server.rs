//! probe-server: reports whether the clients uploading to it stream their bodies.
//!
//! ```text
//! probe-server --addr 0.0.0.0 --port 5002 --cert cert.pem --key key.pem
//! ```

use anyhow::Context;
use clap::Parser;
use stream_probe::config::ServerConfig;
use stream_probe::server::Server;
use stream_probe::tls::TlsSettings;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "probe-server", about = "Classifies uploads as streamed or buffered")]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { config } = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let tls = TlsSettings::from_files(&config.cert, &config.key)?;
    let server = Server::bind(&config, &tls).await?;
    info!(addr = %server.local_addr()?, "start listening");

    server.run(shutdown_signal()).await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutting down the server"),
        Err(e) => error!(cause = %e, "can't listen for the interrupt signal, shutting down"),
    }
}
