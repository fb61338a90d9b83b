use std::error::Error;
use std::fmt::Display;

use bytes::Bytes;
use futures::StreamExt;
use http::header::{CONNECTION, EXPECT};
use http::{Response, StatusCode};
use http_body::Body;
use http_body_util::Empty;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, info, warn};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::connection::DEFAULT_MAX_BODY_SIZE;
use crate::connection::payload::{collect_payload, write_message};
use crate::handler::Handler;
use crate::protocol::{HttpError, Message, ParseError, PayloadSize, RequestHeader, ResponseHead, SendError};

/// The server side of one HTTP/1.1 connection.
///
/// Requests are served one after another (keep-alive) until the peer closes
/// the connection, asks for `Connection: close`, or sends something that
/// cannot be read. A request whose body cannot be read to completion is
/// answered with `400 Bad Request` and never reaches the handler.
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
    max_body_size: usize,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Bodies larger than `max_body_size` are rejected with `400 Bad Request`.
    #[must_use]
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub async fn process<H>(mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
        H::RespBody: Body<Data = Bytes> + Unpin,
        <H::RespBody as Body>::Error: Display,
    {
        loop {
            match self.framed_read.next().await {
                Some(Ok(Message::Header((header, payload_size)))) => {
                    let keep_alive = !wants_close(&header);
                    self.do_process(header, payload_size, handler).await?;
                    if !keep_alive {
                        info!("peer asked to close the connection");
                        self.framed_write.get_mut().shutdown().await.map_err(SendError::io)?;
                        return Ok(());
                    }
                }

                Some(Ok(Message::Payload(_))) => {
                    error!("received payload while expecting a request head");
                    self.do_send_response(build_error_response(StatusCode::BAD_REQUEST)).await?;
                    return Err(ParseError::invalid_body("need header while receive body").into());
                }

                Some(Err(e)) => {
                    error!(cause = %e, "can't receive next request");
                    self.do_send_response(build_error_response(StatusCode::BAD_REQUEST)).await?;
                    return Err(e.into());
                }

                None => {
                    info!("cant read more request, break this connection down");
                    return Ok(());
                }
            }
        }
    }

    async fn do_process<H>(&mut self, header: RequestHeader, payload_size: PayloadSize, handler: &H) -> Result<(), HttpError>
    where
        H: Handler,
        H::RespBody: Body<Data = Bytes> + Unpin,
        <H::RespBody as Body>::Error: Display,
    {
        if !payload_size.is_empty() && expects_continue(&header) {
            let writer = self.framed_write.get_mut();
            writer.write_all(b"HTTP/1.1 100 Continue\r\n\r\n").await.map_err(SendError::io)?;
            writer.flush().await.map_err(SendError::io)?;
            info!("receive expect request header, sent continue response");
        }

        let body = match collect_payload(&mut self.framed_read, self.max_body_size).await {
            Ok(body) => body,
            Err(e) => {
                warn!(cause = %e, method = %header.method(), path = header.uri().path(), "failed to read request body");
                // the peer may already be gone, in which case nobody reads this
                if let Err(send_error) = self.do_send_response(build_error_response(StatusCode::BAD_REQUEST)).await {
                    warn!(cause = %send_error, "can't send bad request response");
                }
                return Err(e.into());
            }
        };

        let request = header.body(body);
        let response_result = handler.call(request).await;
        self.send_response(response_result).await
    }

    async fn send_response<T, E>(&mut self, response_result: Result<Response<T>, E>) -> Result<(), HttpError>
    where
        T: Body<Data = Bytes> + Unpin,
        T::Error: Display,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        match response_result {
            Ok(response) => self.do_send_response(response).await,
            Err(e) => {
                let e: Box<dyn Error + Send + Sync> = e.into();
                error!(cause = %e, "handler failed, sending internal server error");
                self.do_send_response(build_error_response(StatusCode::INTERNAL_SERVER_ERROR)).await
            }
        }
    }

    async fn do_send_response<T>(&mut self, response: Response<T>) -> Result<(), HttpError>
    where
        T: Body<Data = Bytes> + Unpin,
        T::Error: Display,
    {
        let (parts, body) = response.into_parts();
        write_message(&mut self.framed_write, ResponseHead::from_parts(parts, ()), body).await?;
        Ok(())
    }
}

fn expects_continue(header: &RequestHeader) -> bool {
    header.headers().get(EXPECT).is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"100-continue"))
}

fn wants_close(header: &RequestHeader) -> bool {
    header
        .headers()
        .get_all(CONNECTION)
        .iter()
        .flat_map(|value| value.as_bytes().split(|b| *b == b','))
        .any(|token| token.trim_ascii().eq_ignore_ascii_case(b"close"))
}

fn build_error_response(status_code: StatusCode) -> Response<Empty<Bytes>> {
    let mut response = Response::new(Empty::new());
    *response.status_mut() = status_code;
    response
}
