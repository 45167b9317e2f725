//! Error handlers.
//!
//! Each failure kind has its own handler. Handlers not configured fall
//! back to the defaults here, which answer with `{"error": "..."}`.

use daedalus_config::Handlers;
use daedalus_core::{
    ErrorHandler, Failure, RequestHead, Response, ResponseExt, ServiceResolver, ServiceResult,
};
use http::header::{HeaderValue, ALLOW};
use http::StatusCode;
use std::fmt;
use std::sync::Arc;

/// Default `404 Not Found` handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundHandler;

impl ErrorHandler for NotFoundHandler {
    fn handle(&self, _head: &RequestHead, _failure: &Failure, _response: Response) -> Response {
        Response::error_json(StatusCode::NOT_FOUND, "Not Found")
    }
}

/// Default `405 Method Not Allowed` handler. Sets `Allow`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAllowedHandler;

impl ErrorHandler for NotAllowedHandler {
    fn handle(&self, _head: &RequestHead, failure: &Failure, _response: Response) -> Response {
        let mut response = Response::error_json(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        if let Failure::MethodNotAllowed { allowed } = failure {
            let allow = allowed
                .iter()
                .map(http::Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(ALLOW, value);
            }
        }
        response
    }
}

/// Default `500 Internal Server Error` handler.
///
/// The error message is not sent to the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalErrorHandler;

impl ErrorHandler for InternalErrorHandler {
    fn handle(&self, _head: &RequestHead, _failure: &Failure, _response: Response) -> Response {
        Response::error_json(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

/// The error handlers of an application.
#[derive(Clone)]
pub struct ErrorHandlers {
    not_found: Arc<dyn ErrorHandler>,
    not_allowed: Arc<dyn ErrorHandler>,
    error: Arc<dyn ErrorHandler>,
}

impl Default for ErrorHandlers {
    fn default() -> Self {
        Self {
            not_found: Arc::new(NotFoundHandler),
            not_allowed: Arc::new(NotAllowedHandler),
            error: Arc::new(InternalErrorHandler),
        }
    }
}

impl ErrorHandlers {
    /// Resolves the configured handlers, defaulting the missing ones.
    ///
    /// # Errors
    ///
    /// Fails if a configured identifier does not resolve to an error handler.
    pub fn build(resolver: &ServiceResolver, handlers: &Handlers) -> ServiceResult<Self> {
        let mut built = Self::default();
        if let Some(id) = &handlers.not_found {
            built.not_found = resolver.resolve_error_handler(id)?;
        }
        if let Some(id) = &handlers.not_allowed {
            built.not_allowed = resolver.resolve_error_handler(id)?;
        }
        if let Some(id) = &handlers.error {
            built.error = resolver.resolve_error_handler(id)?;
        }
        Ok(built)
    }

    /// Answers a failed request with the handler for its failure kind.
    #[must_use]
    pub fn handle(&self, head: &RequestHead, failure: &Failure, response: Response) -> Response {
        let handler = match failure {
            Failure::NotFound => &self.not_found,
            Failure::MethodNotAllowed { .. } => &self.not_allowed,
            Failure::Error(_) => &self.error,
        };
        handler.handle(head, failure, response)
    }
}

impl fmt::Debug for ErrorHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandlers").finish_non_exhaustive()
    }
}
