//! Payload framing: `Content-Length` and `Transfer-Encoding: chunked` bodies.
//!
//! [`PayloadDecoder`] and [`PayloadEncoder`] pick the right strategy from a
//! [`PayloadSize`](crate::protocol::PayloadSize) and delegate to it.

mod chunked_decoder;
mod chunked_encoder;
mod length_decoder;
mod length_encoder;
mod payload_decoder;
mod payload_encoder;

pub use payload_decoder::PayloadDecoder;
pub use payload_encoder::PayloadEncoder;
