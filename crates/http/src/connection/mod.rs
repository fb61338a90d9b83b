//! Driving HTTP/1.1 exchanges over an established byte stream.
//!
//! - [`HttpConnection`]: the server side. Reads requests, buffers each body to
//!   completion, hands the request to a [`Handler`](crate::handler::Handler)
//!   and writes its response.
//! - [`ClientConnection`]: the client side. Writes a request while pulling its
//!   body frame by frame, then reads the response.
//!
//! Both are generic over the reader and writer halves, so they run the same
//! over TCP, TLS or an in-memory duplex pipe.

mod client_connection;
mod http_connection;
mod payload;

pub use client_connection::ClientConnection;
pub use http_connection::HttpConnection;

/// Default upper bound on a buffered message body.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;
