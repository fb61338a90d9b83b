use std::io;

use probe_http::body::{BodySource, Emission};
use tracing::{debug, trace};

use crate::pattern::CHUNK_SIZE_HINT;

const LAST_VALUE: u32 = 4;

/// Where a [`SequencedBody`] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not called yet.
    Fresh,
    /// Has emitted the values `1..=n`.
    Emitting(u32),
    /// Terminal; every call reports end-of-stream.
    Exhausted,
}

/// Request body that writes the number of the current `emit` call, as a
/// little endian `u32`, into the caller's buffer.
///
/// A caller that asks for [`CHUNK_SIZE_HINT`] bytes at a time gets the values
/// `1, 2, 3, 4` on four calls and end-of-stream on the fifth. A caller that
/// asks for more than that is not streaming: it gets the value `1` and
/// end-of-stream at once.
///
/// Every non-empty emission reports the whole buffer as written, so the
/// transport sends as many bytes as it asked for. Only the leading four carry
/// the value; the rest keep whatever the transport put there.
#[derive(Debug, Default)]
pub struct SequencedBody {
    calls: u32,
    exhausted: bool,
}

impl SequencedBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (self.exhausted, self.calls) {
            (true, _) => Phase::Exhausted,
            (false, 0) => Phase::Fresh,
            (false, n) => Phase::Emitting(n),
        }
    }
}

impl BodySource for SequencedBody {
    fn emit(&mut self, buf: &mut [u8]) -> io::Result<Emission> {
        if self.exhausted || self.calls >= LAST_VALUE {
            self.exhausted = true;
            trace!(calls = self.calls, "body source exhausted");
            return Ok(Emission::end());
        }

        let requested = buf.len();
        if requested == 0 {
            return Ok(Emission::more(0));
        }

        self.calls += 1;
        let value = self.calls.to_le_bytes();
        let prefix = requested.min(value.len());
        buf[..prefix].copy_from_slice(&value[..prefix]);

        if requested > CHUNK_SIZE_HINT {
            debug!(requested, "caller asked for more than one value, ending the body");
            self.exhausted = true;
            return Ok(Emission::last(requested));
        }

        trace!(call = self.calls, requested, "emitted sequence value");
        Ok(Emission::more(requested))
    }
}
