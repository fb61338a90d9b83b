//! Body framing rules shared by the head codecs, see
//! [RFC 9112 Section 6](https://www.rfc-editor.org/rfc/rfc9112#section-6).

use http::{HeaderMap, HeaderValue, StatusCode, header};

use crate::protocol::{ParseError, PayloadSize};

const CHUNKED: HeaderValue = HeaderValue::from_static("chunked");
const ZERO: HeaderValue = HeaderValue::from_static("0");

/// Framing of a received request whose method allows a body.
///
/// A `Transfer-Encoding` that does not end in `chunked` leaves the body length
/// unknown, which a server must reject.
pub(super) fn request_payload_size(headers: &HeaderMap) -> Result<PayloadSize, ParseError> {
    payload_size(headers, true)
}

/// Framing of a received response whose status allows a body.
///
/// Read-until-close bodies are not supported, so a response without usable
/// framing is treated as empty.
pub(super) fn response_payload_size(headers: &HeaderMap) -> Result<PayloadSize, ParseError> {
    payload_size(headers, false)
}

fn payload_size(headers: &HeaderMap, reject_unchunked: bool) -> Result<PayloadSize, ParseError> {
    let te_header = headers.get(header::TRANSFER_ENCODING);
    let cl_header = headers.get(header::CONTENT_LENGTH);

    match (te_header, cl_header) {
        (None, None) => Ok(PayloadSize::Empty),

        (Some(te_value), None) => {
            if is_chunked(te_value) {
                Ok(PayloadSize::Chunked)
            } else if reject_unchunked {
                Err(ParseError::invalid_header("transfer-encoding must end with chunked"))
            } else {
                Ok(PayloadSize::Empty)
            }
        }

        (None, Some(cl_value)) => {
            let cl_str = cl_value.to_str().map_err(|_e| ParseError::invalid_content_length("value can't to_str"))?;
            let length = cl_str
                .trim()
                .parse::<u64>()
                .map_err(|_e| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;

            Ok(PayloadSize::Length(length))
        }

        (Some(_), Some(_)) => {
            Err(ParseError::invalid_content_length("transfer_encoding and content_length both present in headers"))
        }
    }
}

/// Responses to which no body is ever attached.
pub(super) fn status_has_body(status: StatusCode) -> bool {
    !(status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED)
}

/// `chunked` must be the final transfer coding when present.
pub(super) fn is_chunked(value: &HeaderValue) -> bool {
    value.as_bytes().rsplit(|b| *b == b',').next().is_some_and(|last| last.trim_ascii().eq_ignore_ascii_case(b"chunked"))
}

/// Replaces any caller supplied framing header with the one matching `payload_size`.
///
/// `empty_as_zero` adds `Content-Length: 0` for empty bodies, which requests
/// carrying a method with body semantics need so the peer does not wait.
pub(super) fn set_framing_header(headers: &mut HeaderMap, payload_size: PayloadSize, empty_as_zero: bool) {
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONTENT_LENGTH);

    match payload_size {
        PayloadSize::Length(n) => {
            headers.insert(header::CONTENT_LENGTH, n.into());
        }
        PayloadSize::Chunked => {
            headers.insert(header::TRANSFER_ENCODING, CHUNKED);
        }
        PayloadSize::Empty if empty_as_zero => {
            headers.insert(header::CONTENT_LENGTH, ZERO);
        }
        PayloadSize::Empty => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn check_is_chunked() {
        assert!(is_chunked(&HeaderValue::from_static("chunked")));
        assert!(is_chunked(&HeaderValue::from_static("gzip, chunked")));
        assert!(!is_chunked(&HeaderValue::from_static("chunked, gzip")));
        assert!(!is_chunked(&HeaderValue::from_static("gzip")));
    }

    #[test]
    fn content_length_framing() {
        assert_eq!(request_payload_size(&headers(&[("content-length", "16")])).unwrap(), PayloadSize::Length(16));
        assert!(request_payload_size(&headers(&[("content-length", "sixteen")])).is_err());
    }

    #[test]
    fn both_framing_headers_rejected() {
        let map = headers(&[("content-length", "4"), ("transfer-encoding", "chunked")]);
        assert!(request_payload_size(&map).is_err());
    }

    #[test]
    fn no_framing_is_empty() {
        assert_eq!(request_payload_size(&HeaderMap::new()).unwrap(), PayloadSize::Empty);
    }

    #[test]
    fn unchunked_transfer_encoding() {
        let map = headers(&[("transfer-encoding", "gzip")]);
        assert!(matches!(request_payload_size(&map), Err(ParseError::InvalidHeader { .. })));
        assert_eq!(response_payload_size(&map).unwrap(), PayloadSize::Empty);
    }

    #[test]
    fn framing_header_replaced() {
        let mut map = headers(&[("content-length", "99")]);
        set_framing_header(&mut map, PayloadSize::Chunked, true);
        assert!(map.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(map.get(header::TRANSFER_ENCODING).unwrap(), "chunked");

        set_framing_header(&mut map, PayloadSize::Empty, true);
        assert_eq!(map.get(header::CONTENT_LENGTH).unwrap(), "0");

        set_framing_header(&mut map, PayloadSize::Empty, false);
        assert!(map.is_empty());
    }
}
