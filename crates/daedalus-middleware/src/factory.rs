//! Middleware built from configured service identifiers.
//!
//! The factory checks every identifier when it is asked for it, so an
//! unknown or mistyped identifier stops application startup. The returned
//! [`LazyMiddleware`] still re-resolves its service on every invocation,
//! which keeps factory-registered services fresh per request.

use crate::stack::BoxedMiddleware;
use daedalus_core::{
    BoxFuture, HandlerResult, Middleware, Next, Request, Response, ServiceResolver, ServiceResult,
};
use std::sync::Arc;

/// Creates middleware from service identifiers.
#[derive(Debug, Clone)]
pub struct MiddlewareFactory {
    resolver: ServiceResolver,
}

impl MiddlewareFactory {
    /// Creates a factory resolving through `resolver`.
    #[must_use]
    pub fn new(resolver: ServiceResolver) -> Self {
        Self { resolver }
    }

    /// Returns the resolver backing this factory.
    #[must_use]
    pub fn resolver(&self) -> &ServiceResolver {
        &self.resolver
    }

    /// Creates a middleware for one identifier.
    ///
    /// # Errors
    ///
    /// Fails if the identifier resolves to nothing, or to a service that is
    /// not a middleware.
    pub fn create_from_identifier(&self, identifier: &str) -> ServiceResult<BoxedMiddleware> {
        self.resolver.resolve_middleware(identifier)?;
        Ok(Arc::new(LazyMiddleware {
            identifier: identifier.to_string(),
            resolver: self.resolver.clone(),
        }))
    }

    /// Creates middleware for a list of identifiers, preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first identifier that does not resolve to a middleware.
    pub fn create_from_identifiers<S>(&self, identifiers: &[S]) -> ServiceResult<Vec<BoxedMiddleware>>
    where
        S: AsRef<str>,
    {
        identifiers
            .iter()
            .map(|identifier| self.create_from_identifier(identifier.as_ref()))
            .collect()
    }
}

/// A middleware resolved from the container each time it runs.
pub struct LazyMiddleware {
    identifier: String,
    resolver: ServiceResolver,
}

impl LazyMiddleware {
    /// Returns the configured identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl Middleware for LazyMiddleware {
    fn name(&self) -> &str {
        &self.identifier
    }

    fn process<'a>(
        &'a self,
        request: Request,
        response: Response,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let middleware = self.resolver.resolve_middleware(&self.identifier)?;
            let forward =
                Next::terminal(move |request, response| Box::pin(next.run(request, response)));
            middleware.process(request, response, forward).await
        })
    }
}
