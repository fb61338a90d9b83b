use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::codec::body::PayloadDecoder;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize};

/// Decodes one message head with `H`, then its payload, then the next head.
///
/// `payload_decoder` is `None` while a head is expected and `Some` while the
/// body of the last decoded head is still being read.
#[derive(Debug, Default)]
pub struct MessageDecoder<H> {
    header_decoder: H,
    payload_decoder: Option<PayloadDecoder>,
}

impl<H: Default> MessageDecoder<H> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H> MessageDecoder<H> {
    /// Whether the decoder is in the middle of a message body.
    pub fn is_reading_payload(&self) -> bool {
        self.payload_decoder.is_some()
    }
}

impl<H, T> Decoder for MessageDecoder<H>
where
    H: Decoder<Item = (T, PayloadSize), Error = ParseError>,
{
    type Item = Message<(T, PayloadSize)>;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(payload_decoder) = &mut self.payload_decoder {
            let message = match payload_decoder.decode(src)? {
                Some(item @ PayloadItem::Chunk(_)) => Some(Message::Payload(item)),
                Some(item @ PayloadItem::Eof) => {
                    self.payload_decoder.take();
                    Some(Message::Payload(item))
                }
                None => None,
            };

            return Ok(message);
        }

        let message = match self.header_decoder.decode(src)? {
            Some((head, payload_size)) => {
                self.payload_decoder = Some(payload_size.into());
                Some(Message::Header((head, payload_size)))
            }
            None => None,
        };

        Ok(message)
    }
}
