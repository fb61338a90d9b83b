use std::fmt::Display;

use bytes::{Bytes, BytesMut};
use futures::{SinkExt, Stream, StreamExt};
use http_body::Body;
use http_body_util::BodyExt;
use tokio::io::AsyncWrite;
use tokio_util::codec::{Encoder, FramedWrite};
use tracing::trace;

use crate::ensure;
use crate::protocol::{Message, ParseError, PayloadItem, PayloadSize, SendError};

/// Writes `head` followed by every data frame of `body`.
///
/// Each frame is flushed as soon as it is encoded so that a body producing
/// small frames reaches the peer in small pieces. Trailers are dropped.
pub(crate) async fn write_message<W, E, T, B>(framed_write: &mut FramedWrite<W, E>, head: T, mut body: B) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin,
    E: Encoder<Message<(T, PayloadSize), Bytes>, Error = SendError> + Unpin,
    B: Body<Data = Bytes> + Unpin,
    B::Error: Display,
{
    let payload_size = PayloadSize::from_size_hint(&body.size_hint());
    let header: Message<(T, PayloadSize), Bytes> = Message::Header((head, payload_size));

    if payload_size.is_empty() {
        // head only: flush now, nothing else will
        return framed_write.send(header).await;
    }
    framed_write.feed(header).await?;

    loop {
        match body.frame().await {
            Some(Ok(frame)) => {
                let Ok(data) = frame.into_data() else {
                    trace!("dropping trailers frame");
                    continue;
                };
                trace!(len = data.len(), "writing body frame");
                framed_write.send(Message::<(T, PayloadSize), Bytes>::Payload(PayloadItem::Chunk(data))).await?;
            }
            Some(Err(e)) => return Err(SendError::invalid_body(format!("resolve body error: {e}"))),
            None => return framed_write.send(Message::<(T, PayloadSize), Bytes>::Payload(PayloadItem::Eof)).await,
        }
    }
}

/// Reads payload items from `stream` until `Eof`, buffering at most `max_size` bytes.
pub(crate) async fn collect_payload<S, T>(stream: &mut S, max_size: usize) -> Result<Bytes, ParseError>
where
    S: Stream<Item = Result<Message<T>, ParseError>> + Unpin,
{
    let mut body = BytesMut::new();

    loop {
        match stream.next().await {
            Some(Ok(Message::Payload(PayloadItem::Chunk(bytes)))) => {
                ensure!(body.len() + bytes.len() <= max_size, ParseError::too_large_body(max_size));
                body.extend_from_slice(&bytes);
            }
            Some(Ok(Message::Payload(PayloadItem::Eof))) => return Ok(body.freeze()),
            Some(Ok(Message::Header(_))) => return Err(ParseError::invalid_body("received message head while reading body")),
            Some(Err(e)) => return Err(e),
            None => return Err(ParseError::Incomplete),
        }
    }
}
