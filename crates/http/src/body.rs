//! Request bodies pulled from a caller-supplied [`BodySource`].
//!
//! A transport pulls body bytes by handing the source a buffer; the size of that
//! buffer is the transport's choice, and the source sees it. Two transports are
//! provided:
//!
//! - [`SourceBody`]: streaming. Asks for `write_buffer_size` bytes per call and
//!   turns every emission into its own body frame, which the connection writes
//!   as its own chunk on the wire.
//! - [`read_to_end`]: buffered. Asks for as much as it can hold, starting at
//!   [`INITIAL_READ_CAPACITY`] bytes, until the source is exhausted; the result
//!   is sent in one piece with a `Content-Length`.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use http_body::{Body, Frame, SizeHint};
use tracing::trace;

/// Capacity of the first buffer [`read_to_end`] offers a source.
pub const INITIAL_READ_CAPACITY: usize = 512;

/// The result of one [`BodySource::emit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    /// Number of leading bytes of the buffer that belong to the body.
    pub written: usize,
    /// No further bytes will be produced after this emission.
    pub eof: bool,
}

impl Emission {
    /// `written` bytes, more may follow.
    pub const fn more(written: usize) -> Self {
        Self { written, eof: false }
    }

    /// `written` bytes, and nothing after them.
    pub const fn last(written: usize) -> Self {
        Self { written, eof: true }
    }

    /// Nothing written, nothing will follow.
    pub const fn end() -> Self {
        Self { written: 0, eof: true }
    }
}

/// A pull-based producer of request body bytes.
///
/// The caller chooses the buffer size; the source fills at most `buf.len()`
/// bytes and reports how many of them are part of the body. Implementations
/// are driven sequentially from a single task.
pub trait BodySource {
    fn emit(&mut self, buf: &mut [u8]) -> io::Result<Emission>;
}

impl<S: BodySource + ?Sized> BodySource for &mut S {
    fn emit(&mut self, buf: &mut [u8]) -> io::Result<Emission> {
        (**self).emit(buf)
    }
}

impl<S: BodySource + ?Sized> BodySource for Box<S> {
    fn emit(&mut self, buf: &mut [u8]) -> io::Result<Emission> {
        (**self).emit(buf)
    }
}

fn check_written(emission: Emission, capacity: usize) -> io::Result<Emission> {
    if emission.written > capacity {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("body source reported {} bytes written into a {capacity} byte buffer", emission.written),
        ));
    }
    Ok(emission)
}

/// A streaming [`Body`] over a [`BodySource`].
///
/// Every poll offers the source a zeroed buffer of `write_buffer_size` bytes
/// and yields the written prefix as one data frame. The body has no known
/// length, so it is sent with chunked framing.
#[derive(Debug)]
pub struct SourceBody<S> {
    source: S,
    write_buffer_size: usize,
    finished: bool,
}

impl<S: BodySource> SourceBody<S> {
    /// `write_buffer_size` is raised to 1 if zero.
    pub fn new(source: S, write_buffer_size: usize) -> Self {
        Self { source, write_buffer_size: write_buffer_size.max(1), finished: false }
    }

    pub fn write_buffer_size(&self) -> usize {
        self.write_buffer_size
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: BodySource + Unpin> Body for SourceBody<S> {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        let mut buf = BytesMut::zeroed(this.write_buffer_size);
        let emission = match this.source.emit(&mut buf).and_then(|emission| check_written(emission, buf.len())) {
            Ok(emission) => emission,
            Err(e) => {
                this.finished = true;
                return Poll::Ready(Some(Err(e)));
            }
        };
        trace!(requested = buf.len(), written = emission.written, eof = emission.eof, "pulled from body source");

        // a source that writes nothing into a non-empty buffer has nothing left
        if emission.eof || emission.written == 0 {
            this.finished = true;
        }
        if emission.written == 0 {
            return Poll::Ready(None);
        }

        buf.truncate(emission.written);
        Poll::Ready(Some(Ok(Frame::data(buf.freeze()))))
    }

    fn is_end_stream(&self) -> bool {
        self.finished
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::default()
    }
}

/// Drains `source` into one buffer, the way a transport that cannot stream does.
///
/// The first call offers [`INITIAL_READ_CAPACITY`] bytes; the buffer doubles
/// whenever it fills up. Stops at end-of-stream or at an emission of zero bytes.
pub fn read_to_end<S: BodySource + ?Sized>(source: &mut S) -> io::Result<Bytes> {
    let mut buf = BytesMut::zeroed(INITIAL_READ_CAPACITY);
    let mut filled = 0;

    loop {
        if filled == buf.len() {
            let grown = buf.len() * 2;
            buf.resize(grown, 0);
        }

        let capacity = buf.len() - filled;
        let emission = check_written(source.emit(&mut buf[filled..])?, capacity)?;
        trace!(requested = capacity, written = emission.written, eof = emission.eof, "pulled from body source");
        filled += emission.written;

        if emission.eof || emission.written == 0 {
            buf.truncate(filled);
            return Ok(buf.freeze());
        }
    }
}
