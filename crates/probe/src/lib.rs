//! Detects whether an HTTP client streams its request bodies.
//!
//! The client uploads a [`source::SequencedBody`], which writes the number of
//! each read call into the bytes it produces and stops early when a read asks
//! for more than [`pattern::CHUNK_SIZE_HINT`] bytes. A client that streams
//! therefore delivers [`pattern::STREAMING_PATTERN`], one that buffers delivers
//! a body starting with [`pattern::BULK_PATTERN`], and the server tells them
//! apart with [`classify::Classification::classify`].

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod pattern;
pub mod server;
pub mod source;
pub mod tls;
