//! # Daedalus
//!
//! **Declarative routes, middleware ordering and handler wiring for HTTP APIs**
//!
//! Daedalus builds an application from a configuration file and a service
//! container:
//!
//! - Routes grouped by API namespace, each naming a route service
//! - Route-local middleware, reusable middleware groups and a group per
//!   API namespace
//! - Before-request, before-route and after-route middleware for the whole
//!   application
//! - Configurable not-found, not-allowed and error handlers
//! - Typo detection in route entries, so a misspelled key fails at startup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use daedalus::prelude::*;
//! use std::sync::Arc;
//!
//! let definition = ConfigLoader::new()
//!     .with_file("config/routes.yaml")?
//!     .with_optional_file("config/routes.local.yaml")?
//!     .with_env_prefix("DAEDALUS")
//!     .load()?;
//! init_logging(&definition.logging.to_log_config())?;
//!
//! let mut container = Container::new();
//! container.register_named("app.listChannels", Service::route(ListChannelsRoute));
//! container.register_named("app.goldenKeyAuth", Service::middleware(GoldenKeyAuth));
//!
//! let app = ApplicationFactory::new(definition, Arc::new(container)).create(None)?;
//! let response = app.handle(request).await;
//! ```
//!
//! ## Middleware Order
//!
//! A route's middleware is attached in this order:
//!
//! ```text
//! route middlewares ++ middlewareGroups ++ API namespace group ++ afterRouteMiddlewares
//! ```
//!
//! The last attached middleware is the outermost, so `afterRouteMiddlewares`
//! see the request first.

#![doc(html_root_url = "https://docs.rs/daedalus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod error;
mod factory;
pub mod handlers;

pub use app::Application;
pub use error::{ApplicationError, ApplicationResult};
pub use factory::ApplicationFactory;

pub use daedalus_config as config;
pub use daedalus_core as core;
pub use daedalus_middleware as middleware;
pub use daedalus_router as router;
pub use daedalus_routing as routing;
pub use daedalus_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use daedalus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Application, ApplicationError, ApplicationFactory};

    pub use daedalus_core::{
        empty_response, BoxError, BoxFuture, Container, ErrorHandler, Failure, FnMiddleware,
        FnRoute, HandlerResult, JsonBody, Middleware, Next, Request, RequestError, RequestExt,
        RequestHead, Response, ResponseExt, Route, RouteArguments, Service,
    };

    pub use daedalus_config::{ApiDefinition, ConfigLoader};

    pub use daedalus_routing::{InMemoryRouteCache, RouteCache};

    pub use daedalus_telemetry::{init_logging, LogConfig};
}
