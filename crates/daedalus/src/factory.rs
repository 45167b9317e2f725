//! Building an [`Application`] from an API definition.

use crate::app::Application;
use crate::error::ApplicationResult;
use crate::handlers::ErrorHandlers;
use daedalus_config::{ApiDefinition, RouteConfiguration};
use daedalus_core::{Container, ServiceResolver};
use daedalus_middleware::{GlobalMiddlewares, MiddlewareFactory, MiddlewareGroups, MiddlewareStack};
use daedalus_router::Router;
use daedalus_routing::{
    InMemoryRouteCache, NecessaryRoutesFilter, RouteCache, RouteDefinitionFactory,
    RouteRegistrar, UrlPatternResolver,
};
use daedalus_telemetry::metrics;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Creates applications from an [`ApiDefinition`] and a service container.
///
/// Every identifier in the definition is resolved while the application is
/// created, so a misconfigured service fails here and never during a
/// request.
///
/// # Example
///
/// ```
/// use daedalus::prelude::*;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), daedalus::ApplicationError> {
/// let definition = ConfigLoader::new()
///     .with_string("routes: {}\nsettings:\n  apiPrefix: /api\n", "yaml")?
///     .load()?;
///
/// let app = ApplicationFactory::new(definition, Arc::new(Container::new())).create(None)?;
/// assert!(app.router().is_empty());
/// # Ok(())
/// # }
/// ```
pub struct ApplicationFactory {
    definition: ApiDefinition,
    container: Arc<Container>,
    cache: Arc<dyn RouteCache>,
}

impl ApplicationFactory {
    /// Creates a factory with a private in-memory route cache.
    #[must_use]
    pub fn new(definition: ApiDefinition, container: Arc<Container>) -> Self {
        Self {
            definition,
            container,
            cache: Arc::new(InMemoryRouteCache::new()),
        }
    }

    /// Uses `cache` for filtered route configurations.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn RouteCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The definition applications are built from.
    #[must_use]
    pub fn definition(&self) -> &ApiDefinition {
        &self.definition
    }

    /// Builds an application.
    ///
    /// `request_url` is the URL of the request the application is built
    /// for. It is only used when `registerOnlyNecessaryRoutes` is set.
    ///
    /// # Errors
    ///
    /// Fails if an identifier does not resolve to a service of the right
    /// kind, or a route entry cannot be registered.
    pub fn create(&self, request_url: Option<&str>) -> ApplicationResult<Application> {
        metrics::describe_metrics();

        let definition = &self.definition;
        let settings = &definition.settings;

        let resolver = ServiceResolver::new(Arc::clone(&self.container));
        let middleware_factory = MiddlewareFactory::new(resolver.clone());
        let groups = MiddlewareGroups::build(&middleware_factory, &definition.middleware_groups)?;
        let globals = GlobalMiddlewares::build(
            &middleware_factory,
            &definition.before_request_middlewares,
            &definition.before_route_middlewares,
            &definition.after_route_middlewares,
        )?;
        let handlers = ErrorHandlers::build(&resolver, &definition.handlers)?;

        let routes: Cow<'_, RouteConfiguration> = if settings.register_only_necessary_routes {
            Cow::Owned(NecessaryRoutesFilter::new(Arc::clone(&self.cache)).get_routes(
                request_url,
                &definition.routes,
                settings.use_route_cache,
                &settings.route_api_names_always_include,
            ))
        } else {
            Cow::Borrowed(&definition.routes)
        };

        let registrar = RouteRegistrar::new(
            RouteDefinitionFactory::new(resolver, middleware_factory),
            UrlPatternResolver::new(&settings.api_prefix),
            groups,
            globals.after_route().to_vec(),
        );
        let mut router = Router::new();
        registrar.register_all(
            &mut router,
            &routes,
            settings.detect_typos_in_route_configuration,
        )?;

        let mut stack = MiddlewareStack::new();
        stack
            .extend(globals.before_route().iter().cloned())
            .extend(globals.before_request().iter().cloned());

        Ok(Application::new(router, stack, handlers))
    }
}

impl fmt::Debug for ApplicationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationFactory")
            .field("definition", &self.definition)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}
