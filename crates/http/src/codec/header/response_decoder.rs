use bytes::{Buf, BytesMut};
use http::{Response, StatusCode};
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::trace;

use super::framing::{response_payload_size, status_has_body};
use super::{MAX_HEADER_BYTES, MAX_HEADER_NUM, append_headers, parse_httparse_error, parse_version};
use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, ResponseHead};

/// Parses a response head and announces how its body is framed.
///
/// A response carrying neither `Content-Length` nor chunked
/// `Transfer-Encoding` is treated as bodiless; read-until-close bodies are
/// not supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHeaderDecoder;

impl Decoder for ResponseHeaderDecoder {
    type Item = (ResponseHead, PayloadSize);
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut resp = httparse::Response::new(&mut headers);

        let body_offset = match resp.parse(src).map_err(parse_httparse_error)? {
            Status::Complete(body_offset) => body_offset,
            Status::Partial => {
                ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
                return Ok(None);
            }
        };
        trace!(head_size = body_offset, "parsed response head");
        ensure!(body_offset <= MAX_HEADER_BYTES, ParseError::too_large_header(body_offset, MAX_HEADER_BYTES));

        let status = resp
            .code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .ok_or(ParseError::InvalidStatus(resp.code))?;
        let version = parse_version(resp.version)?;

        let mut head = Response::new(());
        *head.status_mut() = status;
        *head.version_mut() = version;
        append_headers(head.headers_mut(), resp.headers)?;

        src.advance(body_offset);

        let payload_size = if status_has_body(status) { response_payload_size(head.headers())? } else { PayloadSize::Empty };

        Ok(Some((head, payload_size)))
    }
}
