use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::Full;
use indoc::indoc;
use probe_http::connection::ClientConnection;
use stream_probe::classify::Classification;
use stream_probe::client::{UploadMode, UploadOutcome, upload};
use stream_probe::pattern::{CHUNK_SIZE_HINT, CLASSIFICATION_HEADER};
use stream_probe::server::{UploadHandler, serve_connection};
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream, duplex};
use tokio::task::JoinHandle;

fn spawn_server() -> (DuplexStream, JoinHandle<bool>) {
    let (client, server) = duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        let handler = UploadHandler::new().unwrap();
        serve_connection(server, &handler).await.is_ok()
    });
    (client, handle)
}

async fn upload_with(mode: UploadMode) -> UploadOutcome {
    let (client, server) = spawn_server();
    let outcome = upload(client, "localhost:5002", mode).await.unwrap();
    assert!(server.await.unwrap());
    outcome
}

#[tokio::test]
async fn streaming_client_is_detected() {
    let outcome = upload_with(UploadMode::Streaming { write_buffer_size: CHUNK_SIZE_HINT }).await;
    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.classification, Some(Classification::Streaming));
}

#[tokio::test]
async fn buffering_client_is_detected() {
    let outcome = upload_with(UploadMode::Buffered).await;
    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.classification, Some(Classification::Bulk));
}

#[tokio::test]
async fn large_write_buffer_is_not_streaming() {
    let outcome = upload_with(UploadMode::Streaming { write_buffer_size: 32 * 1024 }).await;
    assert_eq!(outcome.classification, Some(Classification::Bulk));
}

#[tokio::test]
async fn corrupted_body_is_malformed() {
    let (client, server) = spawn_server();
    let (reader, writer) = tokio::io::split(client);
    let mut connection = ClientConnection::new(reader, writer);

    let request = Request::post("https://localhost:5002/upload")
        .body(Full::new(Bytes::from_static(&[0xFF, 0x00, 0x00, 0x00])))
        .unwrap();
    let response = connection.send(request).await.unwrap();
    drop(connection);

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CLASSIFICATION_HEADER], "malformed");
    assert!(server.await.unwrap());
}

#[tokio::test]
async fn streaming_upload_wire_format() {
    let (client, mut server) = duplex(64 * 1024);
    let uploader = tokio::spawn(upload(client, "localhost:5002", UploadMode::Streaming { write_buffer_size: CHUNK_SIZE_HINT }));

    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    while !received.ends_with(b"0\r\n\r\n") {
        let n = server.read(&mut buf).await.unwrap();
        assert_ne!(n, 0, "client closed before finishing the body");
        received.extend_from_slice(&buf[..n]);
    }
    server
        .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nx-upload-classification: streaming\r\n\r\n")
        .await
        .unwrap();

    let outcome = uploader.await.unwrap().unwrap();
    assert_eq!(outcome.classification, Some(Classification::Streaming));

    let text = String::from_utf8_lossy(&received);
    assert!(text.starts_with("POST /upload HTTP/1.1\r\n"));
    assert!(text.contains("host: localhost:5002\r\n"));
    assert!(text.contains("content-type: application/octet-stream\r\n"));
    assert!(text.contains("transfer-encoding: chunked\r\n"));
    assert!(text.ends_with(
        "\r\n\r\n4\r\n\x01\x00\x00\x00\r\n4\r\n\x02\x00\x00\x00\r\n4\r\n\x03\x00\x00\x00\r\n4\r\n\x04\x00\x00\x00\r\n0\r\n\r\n"
    ));
}

#[tokio::test]
async fn dropped_upload_is_bad_request() {
    let (client, server) = spawn_server();
    let (mut reader, mut writer) = tokio::io::split(client);

    let truncated = indoc! {"
        POST /upload HTTP/1.1\r
        Host: localhost:5002\r
        Content-Type: application/octet-stream\r
        Content-Length: 16\r
        \r
        \x01\x00\x00\x00"};
    writer.write_all(truncated.as_bytes()).await.unwrap();
    writer.shutdown().await.unwrap();

    let mut response = String::new();
    reader.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(!response.contains(CLASSIFICATION_HEADER));
    assert!(!server.await.unwrap());
}

#[tokio::test]
async fn dropped_chunked_upload_is_bad_request() {
    let (client, server) = spawn_server();
    let (mut reader, mut writer) = tokio::io::split(client);

    let truncated = indoc! {"
        POST /upload HTTP/1.1\r
        Host: localhost:5002\r
        Transfer-Encoding: chunked\r
        \r
        4\r
        \x01\x00\x00\x00\r
        4\r
        \x02\x00"};
    writer.write_all(truncated.as_bytes()).await.unwrap();
    writer.shutdown().await.unwrap();

    let mut response = String::new();
    reader.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(!server.await.unwrap());
}

#[tokio::test]
async fn chunk_size_line_without_digits_is_bad_request() {
    let (client, server) = spawn_server();
    let (mut reader, mut writer) = tokio::io::split(client);

    let broken = indoc! {"
        POST /upload HTTP/1.1\r
        Host: localhost:5002\r
        Transfer-Encoding: chunked\r
        \r
        4\r
        \x01\x00\x00\x00\r
        \r
        \r
        "};
    writer.write_all(broken.as_bytes()).await.unwrap();

    let mut response = String::new();
    reader.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(!response.contains(CLASSIFICATION_HEADER));
    assert!(!server.await.unwrap());
}
