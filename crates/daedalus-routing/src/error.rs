//! Route registration errors.

use daedalus_core::{ServiceError, ServiceKind};
use daedalus_router::RouterError;
use thiserror::Error;

/// Result type alias using [`RegistrationError`].
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Errors raised while turning route configuration into routes.
///
/// Every variant aborts the registration pass. None of them can occur
/// while a request is being served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// A route entry key is one edit away from a known key.
    #[error("Unexpected route definition key in \"{}\", did you mean \"{suggestion}\"?", .path.join(" › "))]
    ConfigurationTypo {
        /// Namespace, pattern, method and the offending key.
        path: Vec<String>,
        /// The known key it most likely means.
        suggestion: String,
    },

    /// The `service` of a route entry is not a route.
    #[error("route service `{identifier}` should implement route, but it is a {actual}")]
    InvalidRouteTarget {
        /// The configured identifier.
        identifier: String,
        /// What the service provides instead.
        actual: ServiceKind,
    },

    /// A route entry field has the wrong shape.
    #[error("invalid route definition in \"{}\": {reason}", .path.join(" › "))]
    InvalidRouteDefinition {
        /// Namespace, pattern, method and the offending key.
        path: Vec<String>,
        /// What is wrong with it.
        reason: String,
    },

    /// The method key of a route entry is not an HTTP method.
    #[error("invalid HTTP method `{method}` in \"{}\"", .path.join(" › "))]
    InvalidHttpMethod {
        /// The configured method key.
        method: String,
        /// Namespace and pattern.
        path: Vec<String>,
    },

    /// Service resolution failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The router rejected the route.
    #[error(transparent)]
    Router(#[from] RouterError),
}

impl RegistrationError {
    /// Creates a typo error.
    pub fn typo(path: Vec<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigurationTypo {
            path,
            suggestion: suggestion.into(),
        }
    }

    /// Creates an invalid definition error.
    pub fn invalid_definition(path: Vec<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRouteDefinition {
            path,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typo_message() {
        let err = RegistrationError::typo(
            vec![
                "new-api/2.0".to_string(),
                "channels".to_string(),
                "POST".to_string(),
                "midlewares".to_string(),
            ],
            "middlewares",
        );
        assert_eq!(
            err.to_string(),
            "Unexpected route definition key in \"new-api/2.0 › channels › POST › midlewares\", did you mean \"middlewares\"?"
        );
    }

    #[test]
    fn test_service_error_is_transparent() {
        let err: RegistrationError = ServiceError::not_found("app.missing").into();
        assert_eq!(err.to_string(), ServiceError::not_found("app.missing").to_string());
    }
}
