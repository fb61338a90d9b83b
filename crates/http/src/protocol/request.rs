//! Request heads as produced by the server-side decoder and consumed by the
//! client-side encoder.

use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri, Version};

/// A request head: method, uri, version and headers, with the body detached.
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
}

impl RequestHeader {
    pub fn into_inner(self) -> Request<()> {
        self.inner
    }

    /// Attaches a body, turning the head back into a full request.
    pub fn body<T>(self, body: T) -> Request<T> {
        self.inner.map(|()| body)
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn version(&self) -> Version {
        self.inner.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// Whether the request method may carry a body at all.
    ///
    /// GET, HEAD, DELETE, OPTIONS and CONNECT requests are read as bodiless
    /// regardless of their framing headers.
    pub fn need_body(&self) -> bool {
        !matches!(self.method(), &Method::GET | &Method::HEAD | &Method::DELETE | &Method::OPTIONS | &Method::CONNECT)
    }
}

impl From<Parts> for RequestHeader {
    #[inline]
    fn from(parts: Parts) -> Self {
        Self { inner: Request::from_parts(parts, ()) }
    }
}

impl From<Request<()>> for RequestHeader {
    #[inline]
    fn from(inner: Request<()>) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_needs_body() {
        let header = RequestHeader::from(Request::post("/upload").body(()).unwrap());
        assert!(header.need_body());
    }

    #[test]
    fn options_has_no_body() {
        let header = RequestHeader::from(Request::options("/upload").body(()).unwrap());
        assert!(!header.need_body());
    }
}
