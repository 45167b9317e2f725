//! Common types used by routes, middleware and error handlers.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;

/// The HTTP request type handed to routes and middleware.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by routes and middleware.
pub type Response = http::Response<Full<Bytes>>;

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A boxed error returned from routes and middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What every route and middleware returns.
pub type HandlerResult = Result<Response, BoxError>;

/// Creates an empty `200 OK` response.
///
/// This is the response a request starts with before the application
/// stack runs.
#[must_use]
pub fn empty_response() -> Response {
    Response::new(Full::new(Bytes::new()))
}

/// Extension trait for building and decorating responses.
pub trait ResponseExt: Sized {
    /// Creates a JSON response with the given status.
    fn json(status: StatusCode, body: &serde_json::Value) -> Response;

    /// Creates a `{"error": message}` JSON response.
    fn error_json(status: StatusCode, message: &str) -> Response;

    /// Replaces the body with JSON and sets the status, keeping existing headers.
    fn with_json(self, status: StatusCode, body: &serde_json::Value) -> Response;

    /// Returns the response with an additional header.
    fn with_header(self, name: HeaderName, value: HeaderValue) -> Response;
}

impl ResponseExt for Response {
    fn json(status: StatusCode, body: &serde_json::Value) -> Response {
        empty_response().with_json(status, body)
    }

    fn error_json(status: StatusCode, message: &str) -> Response {
        Self::json(status, &serde_json::json!({ "error": message }))
    }

    fn with_json(self, status: StatusCode, body: &serde_json::Value) -> Response {
        let (mut parts, _) = self.into_parts();
        parts.status = status;
        parts
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Response::from_parts(parts, Full::new(Bytes::from(body.to_string())))
    }

    fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Response {
        self.headers_mut().append(name, value);
        self
    }
}
