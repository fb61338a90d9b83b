//! `Transfer-Encoding: chunked` bodies, see
//! [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1).
//!
//! Chunk extensions and trailer fields are accepted and discarded.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{ParseError, PayloadItem};

/// Byte-at-a-time state machine over the chunked framing.
///
/// Chunk data is handed out as soon as it is buffered, so a chunk split across
/// reads shows up as several [`PayloadItem::Chunk`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: State,
    remaining: u64,
    /// at least one hex digit of the current size line was read
    size_digits: bool,
}

impl ChunkedDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    /// hex digits of the chunk size
    #[default]
    Size,
    /// whitespace after the size
    SizeLws,
    /// `;ext=value` after the size, ignored
    Extension,
    SizeLf,
    Body,
    BodyCr,
    BodyLf,
    /// a trailer field line, ignored
    Trailer,
    TrailerLf,
    EndCr,
    EndLf,
    End,
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                State::End => {
                    trace!("finished reading chunked data");
                    return Ok(Some(PayloadItem::Eof));
                }
                State::Body => {
                    if src.is_empty() {
                        return Ok(None);
                    }
                    let len = usize::try_from(self.remaining).map_or(src.len(), |remaining| remaining.min(src.len()));
                    self.remaining -= len as u64;
                    if self.remaining == 0 {
                        self.state = State::BodyCr;
                    }
                    trace!(len, "read chunked bytes");
                    return Ok(Some(PayloadItem::Chunk(src.split_to(len).freeze())));
                }
                _ => {
                    if !src.has_remaining() {
                        return Ok(None);
                    }
                    let byte = src.get_u8();
                    self.state = self.next_state(byte)?;
                }
            }
        }
    }
}

impl ChunkedDecoder {
    fn next_state(&mut self, byte: u8) -> Result<State, ParseError> {
        use State::*;

        let next = match (self.state, byte) {
            (Size, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F') => {
                self.push_size_digit(byte)?;
                Size
            }
            (Size, b'\t' | b' ' | b';' | b'\r') if !self.size_digits => {
                return Err(ParseError::invalid_body("chunk size line without hex digits"));
            }
            (Size | SizeLws, b'\t' | b' ') => SizeLws,
            (Size | SizeLws, b';') => Extension,
            (Size | SizeLws | Extension, b'\r') => SizeLf,
            // a bare LF inside an extension would let a lenient peer see a different framing
            (Extension, b'\n') => return Err(ParseError::invalid_body("chunk extension contains newline")),
            (Extension, _) => Extension,
            (SizeLf, b'\n') if self.remaining == 0 => EndCr,
            (SizeLf, b'\n') => Body,
            (BodyCr, b'\r') => BodyLf,
            (BodyLf, b'\n') => {
                self.size_digits = false;
                Size
            }
            (Trailer, b'\r') => TrailerLf,
            (Trailer, _) => Trailer,
            (TrailerLf, b'\n') => EndCr,
            (EndCr, b'\r') => EndLf,
            (EndCr, _) => Trailer,
            (EndLf, b'\n') => End,
            (state, byte) => {
                return Err(ParseError::invalid_body(format!("unexpected byte {byte:#04x} in chunk state {state:?}")));
            }
        };

        Ok(next)
    }

    fn push_size_digit(&mut self, byte: u8) -> Result<(), ParseError> {
        let digit = char::from(byte).to_digit(16).map(u64::from).ok_or_else(|| ParseError::invalid_body("invalid chunk size digit"))?;
        self.remaining = self
            .remaining
            .checked_mul(16)
            .and_then(|size| size.checked_add(digit))
            .ok_or_else(|| ParseError::invalid_body("invalid overflow chunked length"))?;
        self.size_digits = true;
        Ok(())
    }
}
