use bytes::Bytes;
use http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CACHE_CONTROL, CONTENT_TYPE};
use http::response::Builder;
use http::{Method, Request, Response, StatusCode};
use http_body_util::Empty;
use probe_http::handler::Handler;
use tracing::{info, warn};

use crate::classify::Classification;
use crate::error::ServerError;
use crate::pattern::{CLASSIFICATION_HEADER, UPLOAD_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Upload,
}

/// Serves the upload endpoint.
///
/// `POST /upload` classifies the received body and always answers `200`;
/// the verdict is logged and echoed in the `x-upload-classification` header.
/// `OPTIONS /upload` answers CORS preflights so a browser based client can be
/// probed too.
#[derive(Debug)]
pub struct UploadHandler {
    router: matchit::Router<Route>,
}

impl UploadHandler {
    pub fn new() -> Result<Self, ServerError> {
        let mut router = matchit::Router::new();
        router.insert(UPLOAD_PATH, Route::Upload)?;
        Ok(Self { router })
    }

    fn respond(&self, request: &Request<Bytes>) -> Result<Response<Empty<Bytes>>, http::Error> {
        let path = request.uri().path();
        let Ok(matched) = self.router.at(path) else {
            warn!(path, "no route for request");
            return Response::builder().status(StatusCode::NOT_FOUND).body(Empty::new());
        };

        match (*matched.value, request.method()) {
            (Route::Upload, &Method::POST) => upload(request.body()),
            (Route::Upload, &Method::OPTIONS) => cors(Response::builder()).status(StatusCode::NO_CONTENT).body(Empty::new()),
            (Route::Upload, method) => {
                warn!(%method, path, "method not allowed");
                Response::builder().status(StatusCode::METHOD_NOT_ALLOWED).header(ALLOW, "POST, OPTIONS").body(Empty::new())
            }
        }
    }
}

impl Handler for UploadHandler {
    type RespBody = Empty<Bytes>;
    type Error = http::Error;

    fn call(&self, req: Request<Bytes>) -> impl Future<Output = Result<Response<Self::RespBody>, Self::Error>> + Send {
        let response = self.respond(&req);
        async move { response }
    }
}

fn upload(body: &Bytes) -> Result<Response<Empty<Bytes>>, http::Error> {
    let classification = Classification::classify(body);
    info!(body = %body.escape_ascii(), size = body.len(), %classification, "body read");
    info!("{}", classification.verdict());

    cors(Response::builder())
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
        .header("proxy-cache-control", "max-age=604800, public")
        .header(CACHE_CONTROL, "no-store, must-revalidate, private, max-age=0")
        .header(CLASSIFICATION_HEADER, classification.as_str())
        .body(Empty::new())
}

fn cors(builder: Builder) -> Builder {
    builder.header(ACCESS_CONTROL_ALLOW_ORIGIN, "*").header(ACCESS_CONTROL_ALLOW_HEADERS, "*")
}
