//! A small asynchronous HTTP/1.1 implementation built on tokio.
//!
//! The crate covers both ends of a connection over any `AsyncRead` /
//! `AsyncWrite` pair, so the same code runs over plain TCP, TLS or an
//! in-memory pipe:
//!
//! - [`connection::HttpConnection`] serves requests to a [`handler::Handler`].
//!   Request bodies are read to completion before the handler runs, and a body
//!   that cannot be read is answered with `400 Bad Request`.
//! - [`connection::ClientConnection`] sends requests. The request body is
//!   pulled frame by frame and each frame is written as soon as it exists,
//!   with chunked transfer coding when the body length is not known up front.
//! - [`body`] adapts a pull-style byte producer ([`body::BodySource`]) to
//!   [`http_body::Body`], and drains one into a buffer.
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use http_body_util::Full;
//! use probe_http::connection::HttpConnection;
//! use probe_http::handler::make_handler;
//! use std::convert::Infallible;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let handler = make_handler(|request: Request<Bytes>| async move {
//!         let size = request.body().len();
//!         Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(format!("{size} bytes\n")))))
//!     });
//!
//!     let (stream, _) = listener.accept().await?;
//!     let (reader, writer) = stream.into_split();
//!     if let Err(e) = HttpConnection::new(reader, writer).process(&handler).await {
//!         eprintln!("connection error: {e}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Limitations
//!
//! - HTTP/1.1 only
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64
//! - Message bodies are buffered up to
//!   [`DEFAULT_MAX_BODY_SIZE`](connection::DEFAULT_MAX_BODY_SIZE) unless
//!   configured otherwise

pub mod body;
pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
