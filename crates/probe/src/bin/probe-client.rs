//! probe-client: uploads a sequenced body to a probe server.
//!
//! The server decides whether this client streamed the upload; with
//! `--buffered` the body is read in full before it is sent.

use anyhow::Context;
use clap::Parser;
use stream_probe::client::Client;
use stream_probe::config::ClientConfig;
use stream_probe::error::ClientError;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Parser)]
#[command(name = "probe-client", about = "Uploads a sequenced body to a probe server")]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli { config } = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let authority = config.authority();
    let client = Client::new(config)?;

    match client.run().await {
        Ok(outcome) => {
            info!(status = %outcome.status, "Request sent successfully, check the server for diagnostic results.");
            if let Some(classification) = outcome.classification {
                info!(%classification, "{}", classification.verdict());
            }
            Ok(())
        }
        Err(e @ ClientError::ServerStatus(_)) => {
            error!(cause = %e, %authority, "There was an error on the server");
            Err(e.into())
        }
        Err(e) => {
            error!(cause = %e, %authority, "There was an error creating the request");
            Err(e.into())
        }
    }
}
