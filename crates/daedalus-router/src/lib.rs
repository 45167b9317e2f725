//! Route table for Daedalus applications.
//!
//! This crate provides the router routes are registered into. Path matching
//! itself is done by [`matchit`]; the router layers on top of it:
//!
//! - **Method tables**: several methods per pattern, with `405` detection
//! - **Named routes**: reverse URL generation through [`Router::url_for`]
//! - **Per-route middleware**: every route owns a [`MiddlewareStack`](daedalus_middleware::MiddlewareStack)
//! - **Registration seam**: [`RouteCollector`] / [`RouteHandle`], the only
//!   API the route registrar uses
//!
//! # Example
//!
//! ```rust
//! use daedalus_router::{RouteResolution, Router};
//! use http::Method;
//!
//! let router = Router::new();
//! assert!(matches!(
//!     router.resolve(&Method::GET, "/anything"),
//!     RouteResolution::NotFound
//! ));
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod route;
mod router;

pub use error::RouterError;
pub use route::{RegisteredRoute, RouteCollector, RouteHandle};
pub use router::{RouteResolution, Router};
