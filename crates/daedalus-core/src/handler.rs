//! Route targets and error handlers.
//!
//! A [`Route`] is the final handler for a matched path and method. It is
//! invoked with the request and the response built so far, and returns the
//! response. Unlike [`Middleware`](crate::Middleware) it has no continuation.

use crate::types::{BoxError, BoxFuture, HandlerResult, Request, Response};
use http::{HeaderMap, Method, Uri};
use std::fmt;
use std::future::Future;

/// The single-method capability of a route target.
///
/// # Example
///
/// ```rust
/// use daedalus_core::{BoxFuture, HandlerResult, Request, Response, ResponseExt, Route};
/// use http::StatusCode;
///
/// struct HelloWorldRoute;
///
/// impl Route for HelloWorldRoute {
///     fn handle<'a>(&'a self, _request: Request, response: Response) -> BoxFuture<'a, HandlerResult> {
///         Box::pin(async move {
///             Ok(response.with_json(StatusCode::OK, &serde_json::json!(["Hello World"])))
///         })
///     }
/// }
/// ```
pub trait Route: Send + Sync + 'static {
    /// Handles the request and returns the final response.
    fn handle<'a>(&'a self, request: Request, response: Response) -> BoxFuture<'a, HandlerResult>;
}

/// A route built from an async function.
pub struct FnRoute<F> {
    func: F,
}

impl<F> FnRoute<F> {
    /// Wraps a function as a route.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Route for FnRoute<F>
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle<'a>(&'a self, request: Request, response: Response) -> BoxFuture<'a, HandlerResult> {
        Box::pin((self.func)(request, response))
    }
}

/// The parts of a request that survive dispatch, for error reporting.
#[derive(Debug, Clone)]
pub struct RequestHead {
    /// Request method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri,
    /// Request headers.
    pub headers: HeaderMap,
}

impl RequestHead {
    /// Captures the head of a request.
    #[must_use]
    pub fn of(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }
}

/// Why a request could not be answered by a route.
pub enum Failure {
    /// No route pattern matched the path.
    NotFound,
    /// The path matched, but not for this method.
    MethodNotAllowed {
        /// Methods registered for the matched pattern.
        allowed: Vec<Method>,
    },
    /// A route or middleware returned an error.
    Error(BoxError),
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("NotFound"),
            Self::MethodNotAllowed { allowed } => f
                .debug_struct("MethodNotAllowed")
                .field("allowed", allowed)
                .finish(),
            Self::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
        }
    }
}

/// Turns a [`Failure`] into a response.
///
/// Configured per failure kind (`notFound`, `notAllowed`, `error`).
pub trait ErrorHandler: Send + Sync + 'static {
    /// Builds the response for a failed request.
    fn handle(&self, head: &RequestHead, failure: &Failure, response: Response) -> Response;
}
