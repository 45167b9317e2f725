//! The built application.

use crate::handlers::ErrorHandlers;
use daedalus_core::{
    empty_response, Failure, HandlerResult, Next, Request, RequestHead, Response,
};
use daedalus_middleware::MiddlewareStack;
use daedalus_router::{RouteResolution, Router};
use daedalus_telemetry::fields;
use tracing::{debug, error};

/// A router with its application middleware and error handlers.
///
/// A request passes through:
///
/// ```text
/// before-request middleware → before-route middleware → route lookup
///     → route middleware → route
/// ```
///
/// Unmatched paths, unmapped methods and errors returned anywhere in the
/// chain are answered by the [`ErrorHandlers`].
#[derive(Debug)]
pub struct Application {
    router: Router,
    stack: MiddlewareStack,
    handlers: ErrorHandlers,
}

impl Application {
    /// Assembles an application.
    #[must_use]
    pub fn new(router: Router, stack: MiddlewareStack, handlers: ErrorHandlers) -> Self {
        Self {
            router,
            stack,
            handlers,
        }
    }

    /// The route table, for reverse URL generation.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The application middleware stack.
    #[must_use]
    pub fn middleware(&self) -> &MiddlewareStack {
        &self.stack
    }

    /// Handles one request.
    pub async fn handle(&self, request: Request) -> Response {
        let head = RequestHead::of(&request);
        let dispatch = Next::terminal(move |request, response| Box::pin(self.dispatch(request, response)));

        match self.stack.run(request, empty_response(), dispatch).await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    { fields::HTTP_METHOD } = %head.method,
                    { fields::HTTP_PATH } = %head.uri.path(),
                    { fields::ERROR } = %err,
                    "request failed"
                );
                self.handlers
                    .handle(&head, &Failure::Error(err), empty_response())
            }
        }
    }

    async fn dispatch(&self, mut request: Request, response: Response) -> HandlerResult {
        let path = request.uri().path().to_string();
        match self.router.resolve(request.method(), &path) {
            RouteResolution::Found { route, arguments } => {
                request.extensions_mut().insert(arguments);
                route.run(request, response).await
            }
            RouteResolution::NotFound => {
                debug!(
                    { fields::HTTP_METHOD } = %request.method(),
                    { fields::HTTP_PATH } = %path,
                    "no route matched"
                );
                let head = RequestHead::of(&request);
                Ok(self.handlers.handle(&head, &Failure::NotFound, response))
            }
            RouteResolution::MethodNotAllowed { allowed } => {
                debug!(
                    { fields::HTTP_METHOD } = %request.method(),
                    { fields::HTTP_PATH } = %path,
                    ?allowed,
                    "method not allowed"
                );
                let head = RequestHead::of(&request);
                Ok(self
                    .handlers
                    .handle(&head, &Failure::MethodNotAllowed { allowed }, response))
            }
        }
    }
}
