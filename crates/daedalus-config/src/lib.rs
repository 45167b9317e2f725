//! API definition loading for Daedalus.
//!
//! This crate turns configuration files into an [`ApiDefinition`]:
//! - TOML, JSON and YAML layers
//! - Deep merge, where a later `null` unsets a key from an earlier layer
//! - Environment variable overrides for settings and logging
//! - Strict validation (fails on unknown fields outside route entries)
//!
//! # Example
//!
//! ```no_run
//! use daedalus_config::ConfigLoader;
//!
//! # fn main() -> Result<(), daedalus_config::ConfigError> {
//! let definition = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_file("config/routes.yaml")?
//!     .with_optional_file("config/routes.local.yaml")?
//!     .with_env_prefix("DAEDALUS")
//!     .load()?;
//!
//! for api in definition.api_names() {
//!     println!("api: {api}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```yaml
//! routes:
//!   new-api/2.0:
//!     channels:
//!       GET:
//!         service: app.listChannels
//!         middlewareGroups: [auth]
//!       POST:
//!         service: app.createChannel
//!         name: create-channel
//!
//! middlewareGroups:
//!   auth: [app.goldenKeyAuth]
//!   new-api/2.0: [app.versionHeader]
//!
//! afterRouteMiddlewares: [app.audit]
//!
//! handlers:
//!   notFound: app.notFound
//!
//! settings:
//!   detectTyposInRouteConfiguration: true
//!   registerOnlyNecessaryRoutes: true
//!   routeApiNamesAlwaysInclude: [healthcheck]
//!   apiPrefix: /api
//!
//! logging:
//!   level: info
//!   format: json
//! ```
//!
//! # Environment Variable Overrides
//!
//! Settings and logging can be overridden with `PREFIX__SECTION__KEY`:
//!
//! - `DAEDALUS__SETTINGS__USE_ROUTE_CACHE=true`
//! - `DAEDALUS__SETTINGS__API_PREFIX=/api`
//! - `DAEDALUS__LOGGING__LEVEL=debug`

#![doc(html_root_url = "https://docs.rs/daedalus-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
pub mod merge;
mod schema;

pub use config::{ApiDefinition, RouteConfiguration};
pub use error::ConfigError;
pub use loader::{ConfigFormat, ConfigLoader};
pub use schema::{Handlers, LogFormat, LoggingConfig, Settings};
