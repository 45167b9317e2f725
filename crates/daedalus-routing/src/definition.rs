//! Route definitions built from raw route entries.
//!
//! A raw entry is the `httpMethod → {...}` value of the route
//! configuration. [`RouteEntry::classify`] decides whether it describes a
//! route at all, [`RawRouteEntry`] is its typed form and
//! [`RouteDefinitionFactory`] resolves the services it names.

use crate::error::{RegistrationError, RegistrationResult};
use daedalus_core::{Route, ServiceError, ServiceKind, ServiceResolver};
use daedalus_middleware::{BoxedMiddleware, MiddlewareFactory};
use http::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;

/// Route target service identifier.
pub const SERVICE: &str = "service";
/// Route-local middleware identifiers.
pub const MIDDLEWARES: &str = "middlewares";
/// Names of the middleware groups the route belongs to.
pub const MIDDLEWARE_GROUPS: &str = "middlewareGroups";
/// Opt out of the group named after the API namespace.
pub const IGNORE_VERSION_MIDDLEWARE_GROUP: &str = "ignoreVersionMiddlewareGroup";
/// Explicit route name.
pub const NAME: &str = "name";
/// Older spelling of [`MIDDLEWARES`].
pub const LEGACY_MIDDLEWARE: &str = "middleware";

/// Every key a route entry understands.
pub const ROUTE_DEFINITION_KEYS: [&str; 5] = [
    SERVICE,
    MIDDLEWARES,
    MIDDLEWARE_GROUPS,
    IGNORE_VERSION_MIDDLEWARE_GROUP,
    NAME,
];

/// What a raw entry turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEntry {
    /// The entry disables the route. Carries the skip reason.
    Disabled(&'static str),
    /// The entry describes a route.
    Active(Map<String, Value>),
}

impl RouteEntry {
    /// Classifies a raw entry.
    ///
    /// The legacy `middleware` key is renamed first. Then an entry is
    /// disabled when it is not a mapping, is empty or equal to the
    /// all-default sentinel, or has no `service` key.
    #[must_use]
    pub fn classify(raw: &Value) -> Self {
        let Value::Object(map) = raw else {
            return Self::Disabled("not_a_map");
        };

        let mut map = map.clone();
        if !map.contains_key(MIDDLEWARES) {
            if let Some(legacy) = map.remove(LEGACY_MIDDLEWARE) {
                map.insert(MIDDLEWARES.to_string(), legacy);
            }
        }

        if map.is_empty() || is_empty_sentinel(&map) {
            return Self::Disabled("empty");
        }
        if !map.contains_key(SERVICE) {
            return Self::Disabled("no_service");
        }
        Self::Active(map)
    }
}

/// Whether `map` holds exactly the all-default entry.
///
/// `Map` equality compares keys and values regardless of insertion order,
/// so a sentinel written with its keys in any order still matches.
fn is_empty_sentinel(map: &Map<String, Value>) -> bool {
    let sentinel = json!({
        "service": null,
        "middlewares": [],
        "middlewareGroups": [],
        "ignoreVersionMiddlewareGroup": false,
        "name": null
    });
    sentinel.as_object() == Some(map)
}

/// Typed form of an active route entry.
///
/// Keys it does not know are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRouteEntry {
    /// Route target identifier.
    pub service: String,
    /// Route-local middleware identifiers.
    #[serde(default)]
    pub middlewares: Vec<String>,
    /// Middleware group names.
    #[serde(default)]
    pub middleware_groups: Vec<String>,
    /// Skip the group named after the API namespace.
    #[serde(default)]
    pub ignore_version_middleware_group: bool,
    /// Explicit route name.
    #[serde(default)]
    pub name: Option<String>,
}

impl RawRouteEntry {
    /// Reads an active entry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidRouteDefinition`] with `path` if a
    /// known key holds a value of the wrong type.
    pub fn from_map(path: &[&str], map: Map<String, Value>) -> RegistrationResult<Self> {
        serde_json::from_value(Value::Object(map)).map_err(|err| {
            RegistrationError::invalid_definition(
                path.iter().map(ToString::to_string).collect(),
                err.to_string(),
            )
        })
    }
}

/// A route entry with its services resolved.
pub struct RouteDefinition {
    method: Method,
    service: String,
    target: Arc<dyn Route>,
    middlewares: Vec<BoxedMiddleware>,
    middleware_groups: Vec<String>,
    name: Option<String>,
    ignore_version_middleware_group: bool,
}

impl RouteDefinition {
    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The configured target identifier.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The resolved target.
    #[must_use]
    pub fn target(&self) -> &Arc<dyn Route> {
        &self.target
    }

    /// Route-local middleware, in configured order.
    #[must_use]
    pub fn middlewares(&self) -> &[BoxedMiddleware] {
        &self.middlewares
    }

    /// Middleware group names, in configured order.
    #[must_use]
    pub fn middleware_groups(&self) -> &[String] {
        &self.middleware_groups
    }

    /// The explicit route name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the namespace group is skipped for this route.
    #[must_use]
    pub fn ignores_version_middleware_group(&self) -> bool {
        self.ignore_version_middleware_group
    }
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let middlewares: Vec<&str> = self.middlewares.iter().map(|mw| mw.name()).collect();
        f.debug_struct("RouteDefinition")
            .field("method", &self.method)
            .field("service", &self.service)
            .field("middlewares", &middlewares)
            .field("middleware_groups", &self.middleware_groups)
            .field("name", &self.name)
            .field(
                "ignore_version_middleware_group",
                &self.ignore_version_middleware_group,
            )
            .finish_non_exhaustive()
    }
}

/// Builds [`RouteDefinition`]s.
#[derive(Debug, Clone)]
pub struct RouteDefinitionFactory {
    resolver: ServiceResolver,
    middleware_factory: MiddlewareFactory,
}

impl RouteDefinitionFactory {
    /// Creates a factory.
    #[must_use]
    pub fn new(resolver: ServiceResolver, middleware_factory: MiddlewareFactory) -> Self {
        Self {
            resolver,
            middleware_factory,
        }
    }

    /// Resolves the target and the route-local middleware of an entry.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidRouteTarget`] if `service` is not a route
    /// - [`RegistrationError::Service`] if an identifier resolves to nothing,
    ///   or a middleware identifier is not a middleware
    pub fn create(&self, method: Method, entry: RawRouteEntry) -> RegistrationResult<RouteDefinition> {
        let target = self
            .resolver
            .resolve_route(&entry.service)
            .map_err(|err| match err {
                ServiceError::InvalidServiceType {
                    identifier,
                    expected: ServiceKind::Route,
                    actual,
                } => RegistrationError::InvalidRouteTarget { identifier, actual },
                other => other.into(),
            })?;

        let middlewares = self
            .middleware_factory
            .create_from_identifiers(&entry.middlewares)?;

        Ok(RouteDefinition {
            method,
            service: entry.service,
            target,
            middlewares,
            middleware_groups: entry.middleware_groups,
            name: entry.name,
            ignore_version_middleware_group: entry.ignore_version_middleware_group,
        })
    }
}
