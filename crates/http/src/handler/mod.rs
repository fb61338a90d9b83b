//! Request handlers invoked by [`HttpConnection`](crate::connection::HttpConnection).
//!
//! A handler receives the request with its body already read to completion.

use std::error::Error;
use std::future::Future;

use bytes::Bytes;
use http::{Request, Response};
use http_body::Body;

pub trait Handler: Send + Sync {
    type RespBody: Body;
    type Error: Into<Box<dyn Error + Send + Sync>>;

    fn call(&self, req: Request<Bytes>) -> impl Future<Output = Result<Response<Self::RespBody>, Self::Error>> + Send;
}

/// A [`Handler`] backed by an async function, see [`make_handler`].
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<RespBody, Err, F, Fut> Handler for HandlerFn<F>
where
    RespBody: Body,
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<RespBody>, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    type RespBody = RespBody;
    type Error = Err;

    fn call(&self, req: Request<Bytes>) -> impl Future<Output = Result<Response<Self::RespBody>, Self::Error>> + Send {
        (self.f)(req)
    }
}

pub fn make_handler<F, RespBody, Err, Fut>(f: F) -> HandlerFn<F>
where
    RespBody: Body,
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<RespBody>, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
