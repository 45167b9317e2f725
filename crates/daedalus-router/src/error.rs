//! Router errors.

use http::Method;
use thiserror::Error;

/// Errors raised while building the route table or generating URLs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouterError {
    /// The pattern is malformed or conflicts with an existing pattern.
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why the matcher rejected it.
        reason: String,
    },

    /// The method is already mapped on this pattern.
    #[error("route {method} `{pattern}` is already registered")]
    DuplicateRoute {
        /// The duplicated method.
        method: Method,
        /// The pattern.
        pattern: String,
    },

    /// No route carries this name.
    #[error("no route named `{name}`")]
    UnknownRouteName {
        /// The requested name.
        name: String,
    },

    /// A placeholder of the pattern has no value.
    #[error("missing argument `{argument}` for route `{name}`")]
    MissingRouteArgument {
        /// The route name.
        name: String,
        /// The placeholder without a value.
        argument: String,
    },
}
