//! Constants shared by both ends of the detection protocol.
//!
//! None of these travel over the wire: the client and the server agree on
//! them at build time.

/// Bytes a streaming transport is told to request from the body source per call.
///
/// A transport that honors this hint asks for exactly one 4 byte value at a
/// time, which is what lets the source produce the whole streaming pattern.
pub const CHUNK_SIZE_HINT: usize = 4;

/// Capacity a buffering transport asks for on its first read of the body.
pub const BULK_READ_SIZE: usize = probe_http::body::INITIAL_READ_CAPACITY;

/// Body received from a client that streams: `1u32..=4` little endian.
pub const STREAMING_PATTERN: [u8; 16] = streaming_pattern();

/// Leading bytes of the body received from a client that buffers: `1u32` little endian.
pub const BULK_PATTERN: [u8; 4] = 1u32.to_le_bytes();

pub const UPLOAD_PATH: &str = "/upload";

pub const DEFAULT_PORT: u16 = 5002;

/// Name of the informational response header carrying the server's verdict.
pub const CLASSIFICATION_HEADER: &str = "x-upload-classification";

const fn streaming_pattern() -> [u8; 16] {
    let mut pattern = [0u8; 16];
    let mut value = 1u32;
    while value <= 4 {
        let bytes = value.to_le_bytes();
        let offset = (value as usize - 1) * 4;
        let mut i = 0;
        while i < 4 {
            pattern[offset + i] = bytes[i];
            i += 1;
        }
        value += 1;
    }
    pattern
}
