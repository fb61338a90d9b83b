use bytes::{Buf, BytesMut};
use http::{Method, Request, Uri};
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::trace;

use super::framing::request_payload_size;
use super::{MAX_HEADER_BYTES, MAX_HEADER_NUM, append_headers, parse_httparse_error, parse_version};
use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, RequestHeader};

/// Parses a request head and announces how its body is framed.
///
/// Methods without body semantics (see [`RequestHeader::need_body`]) are
/// always decoded as [`PayloadSize::Empty`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestHeaderDecoder;

impl Decoder for RequestHeaderDecoder {
    type Item = (RequestHeader, PayloadSize);
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let body_offset = match req.parse(src).map_err(parse_httparse_error)? {
            Status::Complete(body_offset) => body_offset,
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };
        trace!(head_size = body_offset, "parsed request head");
        ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));

        let method = req.method.ok_or(ParseError::InvalidMethod)?;
        let method = Method::from_bytes(method.as_bytes()).map_err(|_e| ParseError::InvalidMethod)?;
        let uri = req.path.ok_or(ParseError::InvalidUri)?.parse::<Uri>().map_err(|_e| ParseError::InvalidUri)?;
        let version = parse_version(req.version)?;

        let mut request = Request::new(());
        *request.method_mut() = method;
        *request.uri_mut() = uri;
        *request.version_mut() = version;
        append_headers(request.headers_mut(), req.headers)?;

        src.advance(body_offset);

        let header = RequestHeader::from(request);
        let payload_size = if header.need_body() { request_payload_size(header.headers())? } else { PayloadSize::Empty };

        Ok(Some((header, payload_size)))
    }
}
