use bytes::{BufMut, BytesMut};
use http::Version;
use tokio_util::codec::Encoder;
use tracing::error;

use super::framing::{set_framing_header, status_has_body};
use super::{INIT_HEADER_SIZE, write_headers};
use crate::protocol::{PayloadSize, ResponseHead, SendError};

/// Writes a status line and headers; only HTTP/1.1 responses are produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHeaderEncoder;

impl Encoder<(ResponseHead, PayloadSize)> for ResponseHeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (ResponseHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut head, payload_size) = item;

        if head.version() != Version::HTTP_11 {
            error!(http_version = ?head.version(), "unsupported http version");
            return Err(SendError::invalid_head(format!("unsupported http version {:?}", head.version())));
        }

        dst.reserve(INIT_HEADER_SIZE);
        let status = head.status();
        dst.put_slice(b"HTTP/1.1 ");
        dst.put_slice(status.as_str().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(status.canonical_reason().unwrap_or("Unknown").as_bytes());
        dst.put_slice(b"\r\n");

        set_framing_header(head.headers_mut(), payload_size, status_has_body(status));
        write_headers(head.headers(), dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Response, StatusCode};

    #[test]
    fn bad_request_without_body() {
        let head = Response::builder().status(StatusCode::BAD_REQUEST).body(()).unwrap();
        let mut dst = BytesMut::new();
        ResponseHeaderEncoder.encode((head, PayloadSize::Empty), &mut dst).unwrap();
        assert_eq!(&dst[..], b"HTTP/1.1 400 Bad Request\r\ncontent-length: 0\r\n\r\n");
    }

    #[test]
    fn no_content_has_no_length() {
        let head = Response::builder().status(StatusCode::NO_CONTENT).header("allow", "POST, OPTIONS").body(()).unwrap();
        let mut dst = BytesMut::new();
        ResponseHeaderEncoder.encode((head, PayloadSize::Empty), &mut dst).unwrap();
        assert_eq!(&dst[..], b"HTTP/1.1 204 No Content\r\nallow: POST, OPTIONS\r\n\r\n");
    }

    #[test]
    fn http2_head_rejected() {
        let head = Response::builder().version(Version::HTTP_2).body(()).unwrap();
        let mut dst = BytesMut::new();
        assert!(ResponseHeaderEncoder.encode((head, PayloadSize::Empty), &mut dst).is_err());
    }
}
