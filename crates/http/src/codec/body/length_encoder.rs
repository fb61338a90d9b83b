use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

use crate::protocol::{PayloadItem, SendError};

/// Writes body bytes verbatim, refusing to go past the announced length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    remaining: u64,
    eof: bool,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { remaining: length, eof: false }
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            warn!("encode payload_item but the body is already finished");
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(mut bytes) => {
                let len = bytes.remaining() as u64;
                if len > self.remaining {
                    return Err(SendError::invalid_body(format!(
                        "body chunk of {len} bytes exceeds the remaining content-length {}",
                        self.remaining
                    )));
                }
                while bytes.has_remaining() {
                    let chunk = bytes.chunk();
                    let n = chunk.len();
                    dst.extend_from_slice(chunk);
                    bytes.advance(n);
                }
                self.remaining -= len;
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                if self.remaining == 0 {
                    Ok(())
                } else {
                    Err(SendError::invalid_body(format!("body ended {} bytes short of content-length", self.remaining)))
                }
            }
        }
    }
}
