//! Service resolution and request accessor errors.

use crate::ServiceKind;
use thiserror::Error;

/// Result type alias using [`ServiceError`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while resolving a configured service identifier.
///
/// Both variants are startup-time failures: they surface while the route
/// table is being built, never while a request is being served.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The identifier matched neither a registered name nor a type name.
    #[error("service `{identifier}` is registered neither by name nor by type")]
    ServiceNotFound {
        /// The configured identifier.
        identifier: String,
    },

    /// The identifier resolved to a service with the wrong capability.
    #[error("service `{identifier}` should implement {expected}, but it is a {actual}")]
    InvalidServiceType {
        /// The configured identifier.
        identifier: String,
        /// The capability the caller needed.
        expected: ServiceKind,
        /// The capability the service actually provides.
        actual: ServiceKind,
    },
}

impl ServiceError {
    /// Creates a not-found error.
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            identifier: identifier.into(),
        }
    }

    /// Creates a capability mismatch error.
    pub fn invalid_type(
        identifier: impl Into<String>,
        expected: ServiceKind,
        actual: ServiceKind,
    ) -> Self {
        Self::InvalidServiceType {
            identifier: identifier.into(),
            expected,
            actual,
        }
    }

    /// Returns the identifier that failed to resolve.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::ServiceNotFound { identifier } | Self::InvalidServiceType { identifier, .. } => {
                identifier
            }
        }
    }
}

/// Result type alias using [`RequestError`].
pub type RequestResult<T> = Result<T, RequestError>;

/// Errors raised by the [`RequestExt`](crate::RequestExt) accessors.
///
/// Unlike [`ServiceError`] these happen while a request is served; a route
/// usually returns them with `?` and the configured error handler turns
/// them into a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// A path placeholder is absent or blank.
    #[error("Route argument \"{argument}\" is missing in request path")]
    RouteArgumentMissing {
        /// Placeholder name.
        argument: String,
    },

    /// The JSON body has no such top-level key.
    #[error("Field \"{field}\" is missing in request body")]
    RequestFieldMissing {
        /// Body key.
        field: String,
    },

    /// The query string has no such parameter.
    #[error("Query param \"{key}\" is missing in request URI")]
    QueryParamMissing {
        /// Parameter name.
        key: String,
    },

    /// No value of the requested type was stored in the request extensions.
    #[error("Request attribute \"{attribute}\" is missing in request")]
    RequestAttributeMissing {
        /// Type name of the attribute.
        attribute: String,
    },

    /// The body is not valid JSON.
    #[error("request body is not valid JSON: {reason}")]
    InvalidJsonBody {
        /// Decoder message.
        reason: String,
    },

    /// The query string cannot be decoded.
    #[error("query string is malformed: {reason}")]
    InvalidQueryString {
        /// Decoder message.
        reason: String,
    },

    /// A date-time query parameter is not in `Y-m-dTH:M:S±hh:mm` form.
    #[error("Could not parse {key} as datetime: {value}")]
    InvalidDateTime {
        /// Parameter name.
        key: String,
        /// The raw value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ServiceError::not_found("app.missing");
        assert!(err.to_string().contains("app.missing"));
        assert_eq!(err.identifier(), "app.missing");
    }

    #[test]
    fn test_invalid_type_display() {
        let err = ServiceError::invalid_type("auth", ServiceKind::Middleware, ServiceKind::Route);
        let msg = err.to_string();
        assert!(msg.contains("auth"));
        assert!(msg.contains("middleware"));
        assert!(msg.contains("route"));
    }

    #[test]
    fn test_request_error_messages() {
        let err = RequestError::RouteArgumentMissing {
            argument: "channelId".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Route argument \"channelId\" is missing in request path"
        );

        let err = RequestError::QueryParamMissing {
            key: "since".to_string(),
        };
        assert_eq!(err.to_string(), "Query param \"since\" is missing in request URI");
    }
}
