//! # Daedalus Core
//!
//! Core types and traits shared by every Daedalus crate.
//!
//! - [`Container`] - Service container with lookup by name and by type name
//! - [`ServiceResolver`] - Try-by-name, then try-by-type resolution
//! - [`Route`] - Final handler of a matched path and method
//! - [`Middleware`] / [`Next`] - Chain-of-responsibility units and their continuation
//! - [`ErrorHandler`] - Turns routing failures into responses
//! - [`RequestExt`] - Path arguments, query parameters, attributes and JSON body fields
//! - [`ServiceError`] / [`RequestError`] - Resolution and request accessor failures

#![doc(html_root_url = "https://docs.rs/daedalus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arguments;
pub mod di;
mod error;
mod handler;
mod middleware;
mod request;
pub mod resolver;
mod types;

pub use arguments::RouteArguments;
pub use di::{Capability, Container, Service, ServiceKind};
pub use error::{RequestError, RequestResult, ServiceError, ServiceResult};
pub use handler::{ErrorHandler, Failure, FnRoute, RequestHead, Route};
pub use middleware::{FnMiddleware, Middleware, Next};
pub use request::{JsonBody, RequestExt, DATE_TIME_FORMAT};
pub use resolver::{Lookup, ResolvedService, ServiceResolver};
pub use types::{empty_response, BoxError, BoxFuture, HandlerResult, Request, Response, ResponseExt};
