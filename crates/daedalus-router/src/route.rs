//! Registered routes and the registration seam.

use crate::error::RouterError;
use daedalus_core::{HandlerResult, Next, Request, Response, Route};
use daedalus_middleware::{BoxedMiddleware, MiddlewareStack};
use http::Method;
use std::fmt;
use std::sync::Arc;

/// Anything routes can be mapped into.
///
/// The route registrar only talks to the router through this trait, which
/// keeps registration testable against a recording double.
pub trait RouteCollector {
    /// The handle returned for a freshly mapped route.
    type Route: RouteHandle;

    /// Maps `methods` on `pattern` to `target`.
    ///
    /// # Errors
    ///
    /// Fails if the pattern is invalid or a method is already mapped on it.
    fn map(
        &mut self,
        methods: &[Method],
        pattern: &str,
        target: Arc<dyn Route>,
    ) -> Result<&mut Self::Route, RouterError>;
}

/// A mapped route that can still be named and decorated.
pub trait RouteHandle {
    /// Sets the route name used for reverse URL generation.
    fn set_name(&mut self, name: String);

    /// Attaches a middleware. It becomes the new outermost layer.
    fn add(&mut self, middleware: BoxedMiddleware);
}

/// A route in the route table.
pub struct RegisteredRoute {
    methods: Vec<Method>,
    pattern: String,
    name: Option<String>,
    target: Arc<dyn Route>,
    stack: MiddlewareStack,
}

impl RegisteredRoute {
    pub(crate) fn new(methods: Vec<Method>, pattern: String, target: Arc<dyn Route>) -> Self {
        Self {
            methods,
            pattern,
            name: None,
            target,
            stack: MiddlewareStack::new(),
        }
    }

    /// Returns the methods this route answers.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Returns the URL pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the route name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the route target.
    #[must_use]
    pub fn target(&self) -> &Arc<dyn Route> {
        &self.target
    }

    /// Returns the middleware stack wrapping the target.
    #[must_use]
    pub fn stack(&self) -> &MiddlewareStack {
        &self.stack
    }

    /// Returns the names of the attached middleware, in attach order.
    #[must_use]
    pub fn middleware_names(&self) -> Vec<&str> {
        self.stack.names()
    }

    /// Runs the middleware stack around the target.
    pub async fn run(&self, request: Request, response: Response) -> HandlerResult {
        self.stack
            .run(request, response, Next::route(self.target.as_ref()))
            .await
    }
}

impl RouteHandle for RegisteredRoute {
    fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    fn add(&mut self, middleware: BoxedMiddleware) {
        self.stack.add(middleware);
    }
}

impl fmt::Debug for RegisteredRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredRoute")
            .field("methods", &self.methods)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .field("middlewares", &self.stack.names())
            .finish_non_exhaustive()
    }
}
