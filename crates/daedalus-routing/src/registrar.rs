//! Registration of configured routes into a router.

use crate::definition::{RawRouteEntry, RouteDefinition, RouteDefinitionFactory, RouteEntry};
use crate::error::{RegistrationError, RegistrationResult};
use crate::typo;
use crate::url::UrlPatternResolver;
use daedalus_config::RouteConfiguration;
use daedalus_middleware::{BoxedMiddleware, MiddlewareGroups};
use daedalus_router::{RouteCollector, RouteHandle};
use daedalus_telemetry::{fields, metrics};
use http::Method;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, trace};

/// Turns route configuration into mapped routes.
///
/// For every `apiNamespace × routePattern × httpMethod` entry the
/// registrar builds a [`RouteDefinition`], maps it into the router, names
/// it and attaches its middleware in this order:
///
/// 1. route-local `middlewares`
/// 2. the groups listed in `middlewareGroups`, in listed order
/// 3. the group named after the API namespace, unless
///    `ignoreVersionMiddlewareGroup` is set
/// 4. the after-route middleware of the application
#[derive(Clone)]
pub struct RouteRegistrar {
    definitions: RouteDefinitionFactory,
    urls: UrlPatternResolver,
    groups: MiddlewareGroups,
    after_route: Vec<BoxedMiddleware>,
}

impl RouteRegistrar {
    /// Creates a registrar.
    #[must_use]
    pub fn new(
        definitions: RouteDefinitionFactory,
        urls: UrlPatternResolver,
        groups: MiddlewareGroups,
        after_route: Vec<BoxedMiddleware>,
    ) -> Self {
        Self {
            definitions,
            urls,
            groups,
            after_route,
        }
    }

    /// Registers every entry of `routes`.
    ///
    /// Returns the number of mapped routes.
    ///
    /// # Errors
    ///
    /// Stops at the first entry that fails; see [`RouteRegistrar::register`].
    /// An API namespace that is not a table of patterns is an
    /// [`RegistrationError::InvalidRouteDefinition`]. A pattern whose value
    /// is not a table is skipped like a disabled entry.
    pub fn register_all<C: RouteCollector>(
        &self,
        router: &mut C,
        routes: &RouteConfiguration,
        detect_typos: bool,
    ) -> RegistrationResult<usize> {
        let mut registered = 0;
        for (api_namespace, patterns) in routes {
            let Value::Object(patterns) = patterns else {
                return Err(RegistrationError::invalid_definition(
                    vec![api_namespace.clone()],
                    "expected a table of route patterns",
                ));
            };
            for (route_pattern, route_data) in patterns {
                match route_data {
                    Value::Object(route_data) => {
                        registered +=
                            self.register(router, api_namespace, route_pattern, route_data, detect_typos)?;
                    }
                    _ => {
                        trace!(api = %api_namespace, pattern = %route_pattern, "route pattern disabled");
                        metrics::record_entry_skipped("not_a_map");
                    }
                }
            }
        }
        info!(routes = registered, "route registration complete");
        Ok(registered)
    }

    /// Registers the `httpMethod → entry` table of one route pattern.
    ///
    /// Entries that are not tables, empty, equal to the all-default
    /// sentinel or without `service` are skipped. Returns the number of
    /// mapped routes.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::ConfigurationTypo`] before anything is mapped
    ///   for an entry with a near-miss key, when `detect_typos` is set
    /// - [`RegistrationError::InvalidHttpMethod`] for a method key that is
    ///   not a method
    /// - any error of [`RouteDefinitionFactory::create`]
    /// - [`RegistrationError::Router`] if the router rejects the pattern or
    ///   the method is already mapped on it
    pub fn register<C: RouteCollector>(
        &self,
        router: &mut C,
        api_namespace: &str,
        route_pattern: &str,
        route_data: &Map<String, Value>,
        detect_typos: bool,
    ) -> RegistrationResult<usize> {
        let url_pattern = self.urls.resolve(api_namespace, route_pattern);
        let default_name = self.urls.resolve_route_path(api_namespace, route_pattern);
        let mut registered = 0;

        for (method_key, raw) in route_data {
            let map = match RouteEntry::classify(raw) {
                RouteEntry::Active(map) => map,
                RouteEntry::Disabled(reason) => {
                    trace!(
                        { fields::API_NAMESPACE } = api_namespace,
                        { fields::ROUTE_PATTERN } = route_pattern,
                        { fields::HTTP_METHOD } = %method_key,
                        reason,
                        "route entry skipped"
                    );
                    metrics::record_entry_skipped(reason);
                    continue;
                }
            };

            let path = [api_namespace, route_pattern, method_key.as_str()];
            if detect_typos {
                typo::detect_typos(&path, map.keys().map(String::as_str))?;
            }

            let method = parse_method(method_key, api_namespace, route_pattern)?;
            let entry = RawRouteEntry::from_map(&path, map)?;
            let definition = self.definitions.create(method, entry)?;
            let name = definition
                .name()
                .map_or_else(|| default_name.clone(), ToString::to_string);
            let middlewares = self.middlewares_for(api_namespace, &definition);

            let route = router.map(
                std::slice::from_ref(definition.method()),
                &url_pattern,
                definition.target().clone(),
            )?;
            route.set_name(name.clone());
            let count = middlewares.len();
            for middleware in middlewares {
                route.add(middleware);
            }

            debug!(
                { fields::HTTP_METHOD } = %definition.method(),
                { fields::ROUTE_PATTERN } = %url_pattern,
                { fields::ROUTE_NAME } = %name,
                { fields::SERVICE } = definition.service(),
                middlewares = count,
                "route registered"
            );
            metrics::record_route_registered(api_namespace);
            registered += 1;
        }

        Ok(registered)
    }

    /// The full middleware list of a route, in attach order.
    #[must_use]
    pub fn middlewares_for(
        &self,
        api_namespace: &str,
        definition: &RouteDefinition,
    ) -> Vec<BoxedMiddleware> {
        let mut middlewares = definition.middlewares().to_vec();
        middlewares.extend(
            self.groups
                .get_middlewares_for_groups(definition.middleware_groups()),
        );
        if !definition.ignores_version_middleware_group() {
            middlewares.extend(self.groups.get_middlewares(api_namespace));
        }
        middlewares.extend(self.after_route.iter().cloned());
        middlewares
    }
}

impl fmt::Debug for RouteRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let after_route: Vec<&str> = self.after_route.iter().map(|mw| mw.name()).collect();
        f.debug_struct("RouteRegistrar")
            .field("definitions", &self.definitions)
            .field("urls", &self.urls)
            .field("groups", &self.groups)
            .field("after_route", &after_route)
            .finish()
    }
}

fn parse_method(key: &str, api_namespace: &str, route_pattern: &str) -> RegistrationResult<Method> {
    Method::from_bytes(key.to_uppercase().as_bytes()).map_err(|_| {
        RegistrationError::InvalidHttpMethod {
            method: key.to_string(),
            path: vec![api_namespace.to_string(), route_pattern.to_string()],
        }
    })
}
