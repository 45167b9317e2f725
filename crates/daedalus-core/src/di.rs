//! Service container.
//!
//! Services are registered at application startup and looked up by the
//! identifiers that appear in the route configuration. Every service is
//! reachable by its registered name (if it has one) and by the fully
//! qualified name of its concrete type, e.g. `my_app::routes::HelloWorldRoute`.
//!
//! # Example
//!
//! ```rust
//! use daedalus_core::di::{Container, Service};
//! use daedalus_core::{BoxFuture, HandlerResult, Request, Response, Route};
//!
//! struct HelloWorldRoute;
//!
//! impl Route for HelloWorldRoute {
//!     fn handle<'a>(&'a self, _req: Request, res: Response) -> BoxFuture<'a, HandlerResult> {
//!         Box::pin(async move { Ok(res) })
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register_named("app.helloWorld", Service::route(HelloWorldRoute));
//!
//! assert!(container.get_by_name("app.helloWorld").is_some());
//! assert!(container.get_by_type(std::any::type_name::<HelloWorldRoute>()).is_some());
//! ```

use crate::handler::{ErrorHandler, Route};
use crate::middleware::Middleware;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The capability a registered service provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// A [`Route`] target.
    Route,
    /// A [`Middleware`].
    Middleware,
    /// An [`ErrorHandler`].
    ErrorHandler,
    /// Any other shared value.
    Value,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Route => "route",
            Self::Middleware => "middleware",
            Self::ErrorHandler => "error handler",
            Self::Value => "value",
        })
    }
}

/// A type-erased service instance, tagged with its capability.
#[derive(Clone)]
pub enum Capability {
    /// A route target.
    Route(Arc<dyn Route>),
    /// A middleware.
    Middleware(Arc<dyn Middleware>),
    /// An error handler.
    ErrorHandler(Arc<dyn ErrorHandler>),
    /// Any other value.
    Value(Arc<dyn Any + Send + Sync>),
}

impl Capability {
    /// Returns the kind of this capability.
    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        match self {
            Self::Route(_) => ServiceKind::Route,
            Self::Middleware(_) => ServiceKind::Middleware,
            Self::ErrorHandler(_) => ServiceKind::ErrorHandler,
            Self::Value(_) => ServiceKind::Value,
        }
    }
}

/// A service instance together with the name of its concrete type.
#[derive(Clone)]
pub struct Service {
    type_name: &'static str,
    capability: Capability,
}

impl Service {
    /// Wraps a route target.
    pub fn route<R: Route>(route: R) -> Self {
        Self {
            type_name: type_name::<R>(),
            capability: Capability::Route(Arc::new(route)),
        }
    }

    /// Wraps a middleware.
    pub fn middleware<M: Middleware>(middleware: M) -> Self {
        Self {
            type_name: type_name::<M>(),
            capability: Capability::Middleware(Arc::new(middleware)),
        }
    }

    /// Wraps an error handler.
    pub fn error_handler<H: ErrorHandler>(handler: H) -> Self {
        Self {
            type_name: type_name::<H>(),
            capability: Capability::ErrorHandler(Arc::new(handler)),
        }
    }

    /// Wraps any other shared value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            capability: Capability::Value(Arc::new(value)),
        }
    }

    /// Returns the fully qualified name of the concrete type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the kind of capability this service provides.
    #[must_use]
    pub fn kind(&self) -> ServiceKind {
        self.capability.kind()
    }

    /// Returns the capability.
    #[must_use]
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Returns the route target, if this service is one.
    #[must_use]
    pub fn into_route(self) -> Option<Arc<dyn Route>> {
        match self.capability {
            Capability::Route(route) => Some(route),
            _ => None,
        }
    }

    /// Returns the middleware, if this service is one.
    #[must_use]
    pub fn into_middleware(self) -> Option<Arc<dyn Middleware>> {
        match self.capability {
            Capability::Middleware(middleware) => Some(middleware),
            _ => None,
        }
    }

    /// Returns the error handler, if this service is one.
    #[must_use]
    pub fn into_error_handler(self) -> Option<Arc<dyn ErrorHandler>> {
        match self.capability {
            Capability::ErrorHandler(handler) => Some(handler),
            _ => None,
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind())
            .finish()
    }
}

type ServiceFactory = Arc<dyn Fn() -> Service + Send + Sync>;

#[derive(Clone)]
enum Definition {
    /// One instance shared by every lookup
    Shared(Service),
    /// A fresh instance per lookup
    Factory(ServiceFactory),
}

impl Definition {
    fn instantiate(&self) -> Service {
        match self {
            Self::Shared(service) => service.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

/// A service container with lookup by name and by type name.
///
/// Registering a type name twice replaces the earlier registration for
/// by-type lookups; names are independent of each other.
///
/// # Thread Safety
///
/// The container is `Send + Sync` and is shared as `Arc<Container>` once
/// registration is complete.
#[derive(Default)]
pub struct Container {
    by_name: HashMap<String, Definition>,
    by_type: HashMap<&'static str, Definition>,
}

impl Container {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service reachable only by its type name.
    pub fn register(&mut self, service: Service) {
        self.by_type
            .insert(service.type_name(), Definition::Shared(service));
    }

    /// Registers a service reachable by `name` and by its type name.
    pub fn register_named(&mut self, name: impl Into<String>, service: Service) {
        let definition = Definition::Shared(service.clone());
        self.by_type
            .insert(service.type_name(), definition.clone());
        self.by_name.insert(name.into(), definition);
    }

    /// Registers a factory reachable by `name`.
    ///
    /// The factory runs on every lookup, so each resolution sees a fresh
    /// instance.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Service + Send + Sync + 'static,
    {
        self.by_name
            .insert(name.into(), Definition::Factory(Arc::new(factory)));
    }

    /// Looks a service up by its registered name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Service> {
        self.by_name.get(name).map(Definition::instantiate)
    }

    /// Looks a service up by the fully qualified name of its type.
    #[must_use]
    pub fn get_by_type(&self, type_name: &str) -> Option<Service> {
        self.by_type.get(type_name).map(Definition::instantiate)
    }

    /// Resolves a shared value by its Rust type.
    #[must_use]
    pub fn resolve<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self.get_by_type(type_name::<T>())?.capability {
            Capability::Value(value) => value.downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Checks whether an identifier is known by name or by type.
    #[must_use]
    pub fn has(&self, identifier: &str) -> bool {
        self.by_name.contains_key(identifier) || self.by_type.contains_key(identifier)
    }

    /// Returns the number of distinct registrations (names plus types).
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len() + self.by_type.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_type.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("named", &self.by_name.len())
            .field("typed", &self.by_type.len())
            .finish()
    }
}
