use bytes::{Bytes, BytesMut};
use criterion::{Criterion, criterion_group, criterion_main};
use http::{Request, Response, StatusCode};
use probe_http::codec::{RequestDecoder, ResponseEncoder};
use probe_http::connection::HttpConnection;
use probe_http::handler::make_handler;
use probe_http::protocol::{Message, PayloadSize, ResponseHead};
use std::convert::Infallible;
use std::hint::black_box;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio_util::codec::{Decoder, Encoder};

const CHUNKED_UPLOAD: &[u8] = b"POST /upload HTTP/1.1\r\nHost: localhost:5002\r\nTransfer-Encoding: chunked\r\n\r\n\
4\r\n\x01\x00\x00\x00\r\n4\r\n\x02\x00\x00\x00\r\n4\r\n\x03\x00\x00\x00\r\n4\r\n\x04\x00\x00\x00\r\n0\r\n\r\n";

// Mock IO for testing
#[derive(Clone)]
struct MockIO {
    read_data: Vec<u8>,
    write_data: Vec<u8>,
    read_pos: usize,
}

impl MockIO {
    fn new(read_data: Vec<u8>) -> Self {
        Self { read_data, write_data: Vec::new(), read_pos: 0 }
    }
}

impl AsyncRead for MockIO {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.read_data[self.read_pos..];
        let amt = std::cmp::min(remaining.len(), buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.read_pos += amt;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockIO {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
        self.write_data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }
}

fn bench_request_decoder(c: &mut Criterion) {
    c.bench_function("decode_chunked_upload", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = BytesMut::from(CHUNKED_UPLOAD);
            while let Some(message) = decoder.decode(&mut bytes).unwrap() {
                black_box(message);
            }
        });
    });
}

fn bench_response_encoder(c: &mut Criterion) {
    let response = Response::builder().status(StatusCode::OK).body(()).unwrap();

    c.bench_function("encode_upload_response", |b| {
        b.iter(|| {
            let mut encoder = ResponseEncoder::new();
            let mut bytes = BytesMut::new();
            let (header, ()) = response.clone().into_parts();
            let message = Message::<_, Bytes>::Header((ResponseHead::from_parts(header, ()), PayloadSize::Length(16)));
            encoder.encode(message, &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let handler = make_handler(|request: Request<Bytes>| async move {
        Ok::<_, Infallible>(Response::new(http_body_util::Full::new(request.into_body())))
    });

    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("process_chunked_upload", |b| {
        b.to_async(&runtime).iter(|| async {
            let mock_io = MockIO::new(CHUNKED_UPLOAD.to_vec());
            let (reader, writer) = (mock_io.clone(), mock_io);
            let connection = HttpConnection::new(reader, writer);
            connection.process(&handler).await.unwrap();
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_response_encoder, bench_http_connection);
criterion_main!(benches);
