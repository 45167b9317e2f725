//! Process-wide middleware lists.

use crate::factory::MiddlewareFactory;
use crate::stack::BoxedMiddleware;
use daedalus_core::ServiceResult;

/// Application-level middleware, resolved once at startup.
#[derive(Clone, Default)]
pub struct GlobalMiddlewares {
    before_request: Vec<BoxedMiddleware>,
    before_route: Vec<BoxedMiddleware>,
    after_route: Vec<BoxedMiddleware>,
}

impl GlobalMiddlewares {
    /// Resolves the three configured identifier lists.
    ///
    /// # Errors
    ///
    /// Fails on the first identifier that does not resolve to a middleware.
    pub fn build<S: AsRef<str>>(
        factory: &MiddlewareFactory,
        before_request: &[S],
        before_route: &[S],
        after_route: &[S],
    ) -> ServiceResult<Self> {
        Ok(Self {
            before_request: factory.create_from_identifiers(before_request)?,
            before_route: factory.create_from_identifiers(before_route)?,
            after_route: factory.create_from_identifiers(after_route)?,
        })
    }

    /// Middleware wrapping the whole application, outermost.
    #[must_use]
    pub fn before_request(&self) -> &[BoxedMiddleware] {
        &self.before_request
    }

    /// Middleware running for every request once the request stage is done.
    #[must_use]
    pub fn before_route(&self) -> &[BoxedMiddleware] {
        &self.before_route
    }

    /// Middleware appended to every registered route.
    #[must_use]
    pub fn after_route(&self) -> &[BoxedMiddleware] {
        &self.after_route
    }
}

impl std::fmt::Debug for GlobalMiddlewares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |list: &[BoxedMiddleware]| -> Vec<String> {
            list.iter().map(|mw| mw.name().to_string()).collect()
        };
        f.debug_struct("GlobalMiddlewares")
            .field("before_request", &names(&self.before_request))
            .field("before_route", &names(&self.before_route))
            .field("after_route", &names(&self.after_route))
            .finish()
    }
}
