use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::codec::body::PayloadEncoder;
use crate::protocol::{Message, PayloadSize, SendError};

/// Encodes one message head with `H`, then its payload items.
///
/// A head is rejected while the previous body is unfinished, and a payload item
/// is rejected when no head has been written.
#[derive(Debug, Default)]
pub struct MessageEncoder<H> {
    header_encoder: H,
    payload_encoder: Option<PayloadEncoder>,
}

impl<H: Default> MessageEncoder<H> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H, T, D> Encoder<Message<(T, PayloadSize), D>> for MessageEncoder<H>
where
    H: Encoder<(T, PayloadSize), Error = SendError>,
    D: Buf,
{
    type Error = SendError;

    fn encode(&mut self, item: Message<(T, PayloadSize), D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header((head, payload_size)) => {
                if self.payload_encoder.is_some() {
                    error!("expect payload item but receive message head");
                    return Err(SendError::invalid_head("previous message body is not finished"));
                }

                self.header_encoder.encode((head, payload_size), dst)?;
                if !payload_size.is_empty() {
                    self.payload_encoder = Some(payload_size.into());
                }
                Ok(())
            }

            Message::Payload(payload_item) => {
                let Some(payload_encoder) = &mut self.payload_encoder else {
                    error!("expect message head but receive payload item");
                    return Err(SendError::invalid_body("payload item without message head"));
                };

                let result = payload_encoder.encode(payload_item, dst);
                if payload_encoder.is_finish() {
                    self.payload_encoder.take();
                }
                result
            }
        }
    }
}
