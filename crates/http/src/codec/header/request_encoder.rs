use bytes::{BufMut, BytesMut};
use http::{HeaderValue, Version, header};
use tokio_util::codec::Encoder;
use tracing::error;

use super::framing::set_framing_header;
use super::{INIT_HEADER_SIZE, write_headers};
use crate::protocol::{PayloadSize, RequestHeader, SendError};

/// Writes a request line and headers; only HTTP/1.1 requests are produced.
///
/// The request line carries the origin form (`/path?query`) of the uri. A
/// `Host` header is derived from an absolute uri when the caller set none.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestHeaderEncoder;

impl Encoder<(RequestHeader, PayloadSize)> for RequestHeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (RequestHeader, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut header, payload_size) = item;

        if header.version() != Version::HTTP_11 {
            error!(http_version = ?header.version(), "unsupported http version");
            return Err(SendError::invalid_head(format!("unsupported http version {:?}", header.version())));
        }

        if !header.headers().contains_key(header::HOST) {
            let authority = header.uri().authority().ok_or_else(|| SendError::invalid_head("request has neither host header nor absolute uri"))?;
            let host = HeaderValue::from_str(authority.as_str()).map_err(SendError::invalid_head)?;
            header.headers_mut().insert(header::HOST, host);
        }

        dst.reserve(INIT_HEADER_SIZE);
        let target = header.uri().path_and_query().map_or("/", |path_and_query| path_and_query.as_str());
        dst.put_slice(header.method().as_str().as_bytes());
        dst.put_u8(b' ');
        dst.put_slice(target.as_bytes());
        dst.put_slice(b" HTTP/1.1\r\n");

        let empty_as_zero = header.need_body();
        set_framing_header(header.headers_mut(), payload_size, empty_as_zero);
        write_headers(header.headers(), dst);
        Ok(())
    }
}
