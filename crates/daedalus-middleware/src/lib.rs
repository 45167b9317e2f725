//! # Daedalus Middleware
//!
//! Middleware composition for Daedalus routes.
//!
//! - [`MiddlewareStack`] - Middleware in attach order, run last-in first-out
//! - [`MiddlewareFactory`] - Builds middleware from configured service identifiers
//! - [`MiddlewareGroups`] - Named lists referenced by routes and API namespaces
//! - [`GlobalMiddlewares`] - Before-request, before-route and after-route lists
//!
//! ## Execution Order
//!
//! ```text
//! attached:  A, B, C
//! request →  C → B → A → route
//! response ← C ← B ← A ←─┘
//! ```
//!
//! ## Example
//!
//! ```
//! use daedalus_middleware::{MiddlewareGroups, MiddlewareStack};
//!
//! let groups = MiddlewareGroups::new();
//! assert!(groups.get_middlewares("unknown").is_empty());
//!
//! let mut stack = MiddlewareStack::new();
//! stack.extend(groups.get_middlewares_for_groups(&["g1", "g2"]));
//! assert!(stack.is_empty());
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod factory;
pub mod global;
pub mod groups;
pub mod stack;

pub use factory::{LazyMiddleware, MiddlewareFactory};
pub use global::GlobalMiddlewares;
pub use groups::MiddlewareGroups;
pub use stack::{BoxedMiddleware, MiddlewareStack};
