use http::Response;

/// A response head: status, version and headers, with the body detached.
pub type ResponseHead = Response<()>;
