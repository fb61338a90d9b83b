use std::time::Duration;

use http::StatusCode;
use rustls::pki_types::ServerName;
use stream_probe::classify::Classification;
use stream_probe::client::{Client, UploadMode, upload};
use stream_probe::config::{ClientConfig, ServerConfig};
use stream_probe::pattern::CHUNK_SIZE_HINT;
use stream_probe::server::Server;
use stream_probe::tls::{TlsSettings, insecure_client_config};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio_rustls::TlsConnector;
use tracing::Level;

fn self_signed() -> TlsSettings {
    let key_pair = rcgen::KeyPair::generate().unwrap();
    let cert = rcgen::CertificateParams::new(vec!["localhost".to_string()]).unwrap().self_signed(&key_pair).unwrap();
    TlsSettings::from_pem(cert.pem().as_bytes(), key_pair.serialize_pem().as_bytes()).unwrap()
}

async fn start_server() -> (u16, oneshot::Sender<()>) {
    let (port, shutdown, _running) = start_server_with_handle().await;
    (port, shutdown)
}

async fn start_server_with_handle() -> (u16, oneshot::Sender<()>, JoinHandle<()>) {
    let config = ServerConfig {
        addr: "127.0.0.1".to_string(),
        port: 0,
        cert: "unused.pem".into(),
        key: "unused.pem".into(),
        log_level: Level::INFO,
    };
    let server = Server::bind(&config, &self_signed()).await.unwrap();
    let port = server.local_addr().unwrap().port();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let running = tokio::spawn(server.run(async move {
        let _ = shutdown_rx.await;
    }));
    (port, shutdown_tx, running)
}

fn client_config(port: u16, buffered: bool) -> ClientConfig {
    ClientConfig {
        hostname: "127.0.0.1".to_string(),
        port,
        write_buffer_size: CHUNK_SIZE_HINT,
        buffered,
        log_level: Level::INFO,
    }
}

#[tokio::test]
async fn streaming_upload_over_tls() {
    let (port, shutdown) = start_server().await;

    let outcome = Client::new(client_config(port, false)).unwrap().run().await.unwrap();
    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.classification, Some(Classification::Streaming));

    shutdown.send(()).unwrap();
}

#[tokio::test]
async fn buffered_upload_over_tls() {
    let (port, shutdown) = start_server().await;

    let outcome = Client::new(client_config(port, true)).unwrap().run().await.unwrap();
    assert_eq!(outcome.classification, Some(Classification::Bulk));

    shutdown.send(()).unwrap();
}

#[tokio::test]
async fn server_accepts_several_clients() {
    let (port, shutdown) = start_server().await;

    let mut uploads = JoinSet::new();
    for buffered in [false, true, false, true] {
        uploads.spawn(async move {
            let outcome = Client::new(client_config(port, buffered)).unwrap().run().await;
            (buffered, outcome)
        });
    }

    while let Some(joined) = uploads.join_next().await {
        let (buffered, outcome) = joined.unwrap();
        let expected = if buffered { Classification::Bulk } else { Classification::Streaming };
        assert_eq!(outcome.unwrap().classification, Some(expected));
    }

    shutdown.send(()).unwrap();
}

#[tokio::test]
async fn shutdown_waits_for_open_connections() {
    let (port, shutdown, mut running) = start_server_with_handle().await;

    let tcp_stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let tls_stream = TlsConnector::from(insecure_client_config().unwrap())
        .connect(ServerName::try_from("localhost").unwrap(), tcp_stream)
        .await
        .unwrap();

    shutdown.send(()).unwrap();
    // still serving the open connection
    assert!(tokio::time::timeout(Duration::from_millis(100), &mut running).await.is_err());

    let authority = format!("127.0.0.1:{port}");
    let outcome = upload(tls_stream, &authority, UploadMode::Streaming { write_buffer_size: CHUNK_SIZE_HINT })
        .await
        .unwrap();
    assert_eq!(outcome.classification, Some(Classification::Streaming));

    tokio::time::timeout(Duration::from_secs(5), running).await.unwrap().unwrap();
}
