//! Ordered middleware stack.
//!
//! A [`MiddlewareStack`] holds middleware in the order it was attached and
//! runs it around a terminal step. Execution follows the last-in first-out
//! convention of the hosting framework: the most recently attached
//! middleware is the outermost and sees the request first.
//!
//! ```text
//! attach: A, B, C
//! run:    C → B → A → terminal → A → B → C
//! ```

use daedalus_core::{HandlerResult, Middleware, Next, Request, Response};
use std::fmt;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Middleware in attach order, executed last-in first-out.
///
/// # Example
///
/// ```ignore
/// use daedalus_middleware::MiddlewareStack;
///
/// let mut stack = MiddlewareStack::new();
/// stack.add(auth);
/// stack.add(cors);
///
/// // cors runs first, then auth, then the route
/// let response = stack.run(request, response, Next::route(route.as_ref())).await;
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareStack {
    middlewares: Vec<BoxedMiddleware>,
}

impl MiddlewareStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a middleware. It becomes the new outermost layer.
    pub fn add(&mut self, middleware: BoxedMiddleware) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Attaches every middleware in order.
    pub fn extend<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = BoxedMiddleware>,
    {
        self.middlewares.extend(middlewares);
        self
    }

    /// Runs the stack around `terminal`.
    pub async fn run<'a>(
        &'a self,
        request: Request,
        response: Response,
        terminal: Next<'a>,
    ) -> HandlerResult {
        self.build_chain(terminal).run(request, response).await
    }

    /// Wraps the terminal step, innermost (first attached) first.
    fn build_chain<'a>(&'a self, terminal: Next<'a>) -> Next<'a> {
        self.middlewares
            .iter()
            .fold(terminal, |next, middleware| Next::new(middleware.as_ref(), next))
    }

    /// Returns the middleware names in attach order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the middleware names in execution order (outermost first).
    #[must_use]
    pub fn execution_order(&self) -> Vec<&str> {
        self.middlewares.iter().rev().map(|mw| mw.name()).collect()
    }

    /// Iterates the middleware in attach order.
    pub fn iter(&self) -> impl Iterator<Item = &BoxedMiddleware> {
        self.middlewares.iter()
    }

    /// Returns the number of attached middleware.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("middlewares", &self.names())
            .finish()
    }
}
