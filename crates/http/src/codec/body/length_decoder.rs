//! `Content-Length` framed bodies, see
//! [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::protocol::{ParseError, PayloadItem};

/// Yields whatever part of the remaining `length` bytes is buffered, then `Eof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    length: u64,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        Self { length }
    }
}

impl Decoder for LengthDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.length == 0 {
            return Ok(Some(PayloadItem::Eof));
        }

        if src.is_empty() {
            return Ok(None);
        }

        let len = usize::try_from(self.length).map_or(src.len(), |remaining| remaining.min(src.len()));
        let bytes = src.split_to(len).freeze();

        self.length -= bytes.len() as u64;
        Ok(Some(PayloadItem::Chunk(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_content_length() {
        let mut buffer = BytesMut::from(&b"\x01\x00\x00\x00\x02\x00\x00\x00GET / HTTP/1.1\r\n"[..]);
        let mut decoder = LengthDecoder::new(8);

        let payload = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(payload.as_bytes().unwrap().as_ref(), b"\x01\x00\x00\x00\x02\x00\x00\x00");
        assert_eq!(&buffer[..], b"GET / HTTP/1.1\r\n");

        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }

    #[test]
    fn waits_for_remaining_bytes() {
        let mut buffer = BytesMut::from(&b"\x01\x00"[..]);
        let mut decoder = LengthDecoder::new(4);

        let first = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(first.as_bytes().unwrap().len(), 2);
        assert!(decoder.decode(&mut buffer).unwrap().is_none());

        buffer.extend_from_slice(b"\x00\x00");
        let second = decoder.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(second.as_bytes().unwrap().len(), 2);
        assert!(decoder.decode(&mut buffer).unwrap().unwrap().is_eof());
    }
}
