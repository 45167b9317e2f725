//! # Daedalus Routing
//!
//! Declarative route registration.
//!
//! Route configuration is a nested table
//! `apiNamespace → routePattern → httpMethod → entry`, where an entry names
//! the route service, its own middleware, the middleware groups it belongs
//! to and optionally a route name:
//!
//! ```yaml
//! new-api/2.0:
//!   channels/{channelId}:
//!     GET:
//!       service: app.getChannel
//!       middlewares: [app.cors]
//!       middlewareGroups: [auth]
//!       name: get-channel
//!     DELETE: false  # disabled
//! ```
//!
//! - [`RouteRegistrar`] - Maps every entry into a router with its middleware
//! - [`RouteDefinitionFactory`] - Resolves the services an entry names
//! - [`UrlPatternResolver`] - URL paths and default route names
//! - [`NecessaryRoutesFilter`] - Prunes the configuration to the APIs a URL can hit
//! - [`RouteCache`] - Shared storage for filtered configurations
//!
//! Entry keys one edit away from a known key fail registration with
//! [`RegistrationError::ConfigurationTypo`].

#![doc(html_root_url = "https://docs.rs/daedalus-routing/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod definition;
mod error;
pub mod necessary;
pub mod registrar;
pub mod typo;
mod url;

pub use cache::{InMemoryRouteCache, RouteCache};
pub use definition::{RawRouteEntry, RouteDefinition, RouteDefinitionFactory, RouteEntry};
pub use error::{RegistrationError, RegistrationResult};
pub use necessary::NecessaryRoutesFilter;
pub use registrar::RouteRegistrar;
pub use url::UrlPatternResolver;
