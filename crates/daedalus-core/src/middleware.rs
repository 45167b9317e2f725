//! Core middleware trait and continuation.
//!
//! A [`Middleware`] is invoked with the request, the response built so far
//! and a [`Next`] continuation. Calling [`Next::run`] passes control down
//! the chain; returning without calling it short-circuits the chain and the
//! returned response becomes the result.
//!
//! # Example
//!
//! ```ignore
//! use daedalus_core::{BoxFuture, HandlerResult, Middleware, Next, Request, Response};
//!
//! struct TimingMiddleware;
//!
//! impl Middleware for TimingMiddleware {
//!     fn name(&self) -> &str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         request: Request,
//!         response: Response,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, HandlerResult> {
//!         Box::pin(async move {
//!             let start = std::time::Instant::now();
//!             let response = next.run(request, response).await;
//!             tracing::debug!(elapsed = ?start.elapsed(), "request handled");
//!             response
//!         })
//!     }
//! }
//! ```

use crate::handler::Route;
use crate::types::{BoxFuture, HandlerResult, Request, Response};

/// The three-argument chain-of-responsibility capability.
///
/// # Invariants
///
/// - Middleware calls `next.run()` at most once
/// - Not calling `next.run()` short-circuits everything inside it
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used for logging and inspection.
    fn name(&self) -> &str;

    /// Processes the request.
    ///
    /// # Arguments
    ///
    /// * `request` - The incoming request
    /// * `response` - The response built so far
    /// * `next` - Continuation for the rest of the chain
    fn process<'a>(
        &'a self,
        request: Request,
        response: Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult>;
}

/// Continuation invoking the rest of a middleware chain.
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to process
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain
    Terminal(Box<dyn FnOnce(Request, Response) -> BoxFuture<'a, HandlerResult> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a continuation that invokes `middleware` with `next` as its own continuation.
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal continuation from a function.
    pub fn terminal<F>(f: F) -> Self
    where
        F: FnOnce(Request, Response) -> BoxFuture<'a, HandlerResult> + Send + 'a,
    {
        Self {
            inner: NextInner::Terminal(Box::new(f)),
        }
    }

    /// Creates a terminal continuation that invokes a route.
    pub fn route(route: &'a dyn Route) -> Self {
        Self::terminal(move |request, response| route.handle(request, response))
    }

    /// Invokes the next middleware, or the terminal step.
    pub async fn run(self, request: Request, response: Response) -> HandlerResult {
        match self.inner {
            NextInner::Chain { middleware, next } => {
                middleware.process(request, response, *next).await
            }
            NextInner::Terminal(terminal) => terminal(request, response).await,
        }
    }
}

/// A middleware created from a function returning a boxed future.
///
/// # Example
///
/// ```ignore
/// let middleware = FnMiddleware::new("proof", |request, response, next| {
///     Box::pin(async move { next.run(request, response).await })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(Request, Response, Next<'a>) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    /// Creates a function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(Request, Response, Next<'a>) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn process<'a>(
        &'a self,
        request: Request,
        response: Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        (self.func)(request, response, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{empty_response, ResponseExt};
    use http::header::{HeaderName, HeaderValue};
    use http::StatusCode;

    struct HeaderMiddleware {
        name: &'static str,
    }

    impl Middleware for HeaderMiddleware {
        fn name(&self) -> &str {
            self.name
        }

        fn process<'a>(
            &'a self,
            request: Request,
            response: Response,
            next: Next<'a>,
        ) -> BoxFuture<'a, HandlerResult> {
            Box::pin(async move {
                let response = response.with_header(
                    HeaderName::from_static("x-visited"),
                    HeaderValue::from_static(self.name),
                );
                next.run(request, response).await
            })
        }
    }

    struct StopMiddleware;

    impl Middleware for StopMiddleware {
        fn name(&self) -> &str {
            "stop"
        }

        fn process<'a>(
            &'a self,
            _request: Request,
            _response: Response,
            _next: Next<'a>,
        ) -> BoxFuture<'a, HandlerResult> {
            Box::pin(async { Ok(Response::error_json(StatusCode::UNAUTHORIZED, "stop")) })
        }
    }

    fn request() -> Request {
        http::Request::builder()
            .uri("/test")
            .body(Default::default())
            .unwrap()
    }

    fn ok_terminal<'a>() -> Next<'a> {
        Next::terminal(|_request, response| Box::pin(async move { Ok(response) }))
    }

    #[tokio::test]
    async fn test_terminal() {
        let response = ok_terminal().run(request(), empty_response()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chain_runs_outer_first() {
        let outer = HeaderMiddleware { name: "outer" };
        let inner = HeaderMiddleware { name: "inner" };

        let next = Next::new(&outer, Next::new(&inner, ok_terminal()));
        let response = next.run(request(), empty_response()).await.unwrap();

        let visited: Vec<&str> = response
            .headers()
            .get_all("x-visited")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(visited, vec!["outer", "inner"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_inner() {
        let stop = StopMiddleware;
        let inner = HeaderMiddleware { name: "inner" };

        let next = Next::new(&stop, Next::new(&inner, ok_terminal()));
        let response = next.run(request(), empty_response()).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get("x-visited").is_none());
    }

    #[tokio::test]
    async fn test_fn_middleware() {
        let mw = FnMiddleware::new("fn", |request, response, next| {
            Box::pin(async move { next.run(request, response).await })
        });
        assert_eq!(mw.name(), "fn");

        let response = Next::new(&mw, ok_terminal())
            .run(request(), empty_response())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
