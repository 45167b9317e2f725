//! The route table.
//!
//! Path matching is delegated to [`matchit`]; this module adds what the
//! hosting framework expects on top of it: several methods per pattern,
//! named routes, reverse URL generation and a middleware stack per route.

use crate::error::RouterError;
use crate::route::{RegisteredRoute, RouteCollector};
use daedalus_core::{Route, RouteArguments};
use http::Method;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Outcome of resolving a request against the route table.
#[derive(Debug)]
pub enum RouteResolution<'r> {
    /// A route answers this method on this path.
    Found {
        /// The matched route.
        route: &'r RegisteredRoute,
        /// Values captured by the pattern placeholders.
        arguments: RouteArguments,
    },
    /// No pattern matches the path.
    NotFound,
    /// A pattern matches, but not for this method.
    MethodNotAllowed {
        /// Methods mapped on the matching pattern.
        allowed: Vec<Method>,
    },
}

/// Method table of one pattern.
type MethodTable = IndexMap<Method, usize>;

/// Route table backed by a radix tree matcher.
///
/// Patterns use `{name}` placeholders and a trailing `{*name}` catch-all.
///
/// # Example
///
/// ```rust
/// use daedalus_core::{BoxError, FnRoute, Request, Response};
/// use daedalus_router::{RouteCollector, RouteHandle, RouteResolution, Router};
/// use http::Method;
/// use std::sync::Arc;
///
/// let mut router = Router::new();
/// let route = Arc::new(FnRoute::new(|_req: Request, res: Response| async move {
///     Ok::<_, BoxError>(res)
/// }));
/// router
///     .map(&[Method::GET], "/new-api/2.0/channels/{channelId}", route)
///     .unwrap()
///     .set_name("new-api/2.0/channels/{channelId}".to_string());
///
/// match router.resolve(&Method::GET, "/new-api/2.0/channels/fb_1234") {
///     RouteResolution::Found { arguments, .. } => {
///         assert_eq!(arguments.get("channelId"), Some("fb_1234"));
///     }
///     _ => panic!("route should match"),
/// }
///
/// let url = router
///     .url_for("new-api/2.0/channels/{channelId}", &[("channelId", "xyz")])
///     .unwrap();
/// assert_eq!(url, "/new-api/2.0/channels/xyz");
/// ```
pub struct Router {
    matcher: matchit::Router<usize>,
    patterns: HashMap<String, usize>,
    tables: Vec<MethodTable>,
    routes: Vec<RegisteredRoute>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: matchit::Router::new(),
            patterns: HashMap::new(),
            tables: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Resolves a method and path.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> RouteResolution<'_> {
        let Ok(matched) = self.matcher.at(path) else {
            return RouteResolution::NotFound;
        };
        let table = &self.tables[*matched.value];
        match table.get(method) {
            Some(&index) => RouteResolution::Found {
                route: &self.routes[index],
                arguments: matched.params.iter().collect(),
            },
            None => RouteResolution::MethodNotAllowed {
                allowed: table.keys().cloned().collect(),
            },
        }
    }

    /// Returns the first route carrying `name`.
    #[must_use]
    pub fn route_by_name(&self, name: &str) -> Option<&RegisteredRoute> {
        self.routes.iter().find(|route| route.name() == Some(name))
    }

    /// Builds the path of a named route, filling placeholders from `arguments`.
    ///
    /// Arguments without a matching placeholder are ignored.
    ///
    /// # Errors
    ///
    /// Fails if no route has this name or a placeholder has no argument.
    pub fn url_for(&self, name: &str, arguments: &[(&str, &str)]) -> Result<String, RouterError> {
        let route = self
            .route_by_name(name)
            .ok_or_else(|| RouterError::UnknownRouteName {
                name: name.to_string(),
            })?;

        let pattern = route.pattern();
        let mut url = String::with_capacity(pattern.len());
        let mut rest = pattern;
        while let Some(start) = rest.find('{') {
            url.push_str(&rest[..start]);
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let placeholder = rest[start + 1..start + len].trim_start_matches('*');
            let value = arguments
                .iter()
                .find(|(key, _)| *key == placeholder)
                .map(|(_, value)| *value)
                .ok_or_else(|| RouterError::MissingRouteArgument {
                    name: name.to_string(),
                    argument: placeholder.to_string(),
                })?;
            url.push_str(value);
            rest = &rest[start + len + 1..];
        }
        url.push_str(rest);
        Ok(url)
    }

    /// Iterates the routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RegisteredRoute> {
        self.routes.iter()
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn table_for(&mut self, pattern: &str) -> Result<usize, RouterError> {
        if let Some(&index) = self.patterns.get(pattern) {
            return Ok(index);
        }
        let index = self.tables.len();
        self.matcher
            .insert(pattern, index)
            .map_err(|err| RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })?;
        self.tables.push(MethodTable::new());
        self.patterns.insert(pattern.to_string(), index);
        Ok(index)
    }
}

impl RouteCollector for Router {
    type Route = RegisteredRoute;

    fn map(
        &mut self,
        methods: &[Method],
        pattern: &str,
        target: Arc<dyn Route>,
    ) -> Result<&mut RegisteredRoute, RouterError> {
        let table = self.table_for(pattern)?;
        if let Some(method) = methods.iter().find(|m| self.tables[table].contains_key(*m)) {
            return Err(RouterError::DuplicateRoute {
                method: method.clone(),
                pattern: pattern.to_string(),
            });
        }

        let index = self.routes.len();
        for method in methods {
            self.tables[table].insert(method.clone(), index);
        }
        self.routes.push(RegisteredRoute::new(
            methods.to_vec(),
            pattern.to_string(),
            target,
        ));
        tracing::trace!(?methods, pattern, "route mapped");
        Ok(&mut self.routes[index])
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns.len())
            .field("routes", &self.routes)
            .finish()
    }
}
