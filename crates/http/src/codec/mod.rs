//! Streaming HTTP/1.1 codecs for both ends of a connection.
//!
//! Every message is decoded (or encoded) in two phases: first the head, then the
//! payload as a sequence of [`PayloadItem`](crate::protocol::PayloadItem)s. The
//! phase bookkeeping lives in [`MessageDecoder`] and [`MessageEncoder`]; what
//! differs between requests and responses is only the head codec plugged in.
//!
//! - server side: [`RequestDecoder`] and [`ResponseEncoder`]
//! - client side: [`RequestEncoder`] and [`ResponseDecoder`]
//!
//! # Example
//!
//! ```no_run
//! use probe_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x01\0\0\0"[..]);
//! let head = decoder.decode(&mut buffer);
//! let body = decoder.decode(&mut buffer);
//! ```

mod body;
mod header;
mod message_decoder;
mod message_encoder;

pub use body::{PayloadDecoder, PayloadEncoder};
pub use header::{RequestHeaderDecoder, RequestHeaderEncoder, ResponseHeaderDecoder, ResponseHeaderEncoder};
pub use message_decoder::MessageDecoder;
pub use message_encoder::MessageEncoder;

/// Decodes requests arriving at a server.
pub type RequestDecoder = MessageDecoder<RequestHeaderDecoder>;

/// Encodes responses leaving a server.
pub type ResponseEncoder = MessageEncoder<ResponseHeaderEncoder>;

/// Encodes requests leaving a client.
pub type RequestEncoder = MessageEncoder<RequestHeaderEncoder>;

/// Decodes responses arriving at a client.
pub type ResponseDecoder = MessageDecoder<ResponseHeaderDecoder>;
