//! Message head codecs.
//!
//! - [`RequestHeaderDecoder`] / [`ResponseHeaderDecoder`]: parse heads with
//!   `httparse` and derive the body framing from `Content-Length` and
//!   `Transfer-Encoding`
//! - [`RequestHeaderEncoder`] / [`ResponseHeaderEncoder`]: write heads and set
//!   the framing header matching the outgoing body
//!
//! Limits: at most [`MAX_HEADER_NUM`] headers and [`MAX_HEADER_BYTES`] bytes per head.

mod framing;
mod request_decoder;
mod request_encoder;
mod response_decoder;
mod response_encoder;

pub use request_decoder::RequestHeaderDecoder;
pub use request_encoder::RequestHeaderEncoder;
pub use response_decoder::ResponseHeaderDecoder;
pub use response_encoder::ResponseHeaderEncoder;

use bytes::{BufMut, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, Version};

use crate::protocol::ParseError;

/// Maximum number of headers allowed in a message head
pub const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes of a message head
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Initial buffer size reserved when writing a head
const INIT_HEADER_SIZE: usize = 1024;

fn parse_version(version: Option<u8>) -> Result<Version, ParseError> {
    match version {
        Some(0) => Ok(Version::HTTP_10),
        Some(1) => Ok(Version::HTTP_11),
        v => Err(ParseError::InvalidVersion(v)),
    }
}

fn parse_httparse_error(e: httparse::Error) -> ParseError {
    match e {
        httparse::Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
        e => ParseError::invalid_header(e),
    }
}

fn append_headers(target: &mut HeaderMap, parsed: &[httparse::Header<'_>]) -> Result<(), ParseError> {
    target.reserve(parsed.len());
    for header in parsed {
        let name = HeaderName::from_bytes(header.name.as_bytes()).map_err(ParseError::invalid_header)?;
        let value = HeaderValue::from_bytes(header.value).map_err(ParseError::invalid_header)?;
        target.append(name, value);
    }
    Ok(())
}

fn write_headers(headers: &HeaderMap, dst: &mut BytesMut) {
    for (name, value) in headers {
        dst.put_slice(name.as_ref());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}
