use std::fmt::Display;

use bytes::Bytes;
use futures::StreamExt;
use http::{Request, Response};
use http_body::Body;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, trace};

use crate::codec::{RequestEncoder, ResponseDecoder};
use crate::connection::DEFAULT_MAX_BODY_SIZE;
use crate::connection::payload::{collect_payload, write_message};
use crate::protocol::{HttpError, Message, ParseError, RequestHeader, SendError};

/// The client side of one HTTP/1.1 connection.
///
/// [`send`](Self::send) writes the request head, then pulls the request body
/// one frame at a time and writes every frame as soon as it is produced. A
/// body without an exact size hint goes out with chunked transfer coding, one
/// chunk per frame. The response body is buffered.
#[derive(Debug)]
pub struct ClientConnection<R, W> {
    framed_read: FramedRead<R, ResponseDecoder>,
    framed_write: FramedWrite<W, RequestEncoder>,
    max_body_size: usize,
}

impl<R, W> ClientConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::new(reader, ResponseDecoder::new()),
            framed_write: FramedWrite::new(writer, RequestEncoder::new()),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    #[must_use]
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub async fn send<B>(&mut self, request: Request<B>) -> Result<Response<Bytes>, HttpError>
    where
        B: Body<Data = Bytes> + Unpin,
        B::Error: Display,
    {
        let (parts, body) = request.into_parts();
        let header = RequestHeader::from(parts);
        debug!(method = %header.method(), uri = %header.uri(), "sending request");

        write_message(&mut self.framed_write, header, body).await?;

        loop {
            let head = match self.framed_read.next().await {
                Some(Ok(Message::Header((head, _payload_size)))) => head,
                Some(Ok(Message::Payload(_))) => return Err(ParseError::invalid_body("received payload while expecting response head").into()),
                Some(Err(e)) => return Err(e.into()),
                None => return Err(ParseError::Incomplete.into()),
            };

            let body = collect_payload(&mut self.framed_read, self.max_body_size).await?;
            if head.status().is_informational() {
                trace!(status = %head.status(), "skipping informational response");
                continue;
            }

            debug!(status = %head.status(), body_size = body.len(), "received response");
            let (parts, ()) = head.into_parts();
            return Ok(Response::from_parts(parts, body));
        }
    }

    /// Shuts down the write half so the peer sees the connection end cleanly.
    pub async fn shutdown(mut self) -> Result<(), HttpError> {
        self.framed_write.get_mut().shutdown().await.map_err(SendError::io)?;
        Ok(())
    }
}
