//! Core HTTP protocol types shared by the client and server halves of the crate.
//!
//! - [`Message`]: either a message head or one [`PayloadItem`] of its body
//! - [`PayloadSize`]: how a body is framed on the wire
//! - [`RequestHeader`] / [`ResponseHead`]: heads without bodies attached
//! - [`HttpError`], [`ParseError`], [`SendError`]: error types
//!
//! The codec and connection layers are built on these types; handlers mostly
//! see plain `http::Request` / `http::Response` values.

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::RequestHeader;

mod response;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
