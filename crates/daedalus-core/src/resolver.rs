//! Configured-identifier resolution.
//!
//! Route targets, middleware and error handlers are referenced in the
//! configuration by a string identifier. The identifier is first tried as a
//! registered service name and then as a type name.

use crate::di::{Container, Service, ServiceKind};
use crate::error::{ServiceError, ServiceResult};
use crate::handler::{ErrorHandler, Route};
use crate::middleware::Middleware;
use std::fmt;
use std::sync::Arc;

/// How an identifier was found in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Matched a registered service name.
    ByName,
    /// Matched the fully qualified name of a registered type.
    ByType,
}

impl Lookup {
    /// The order lookups are attempted in.
    pub const ORDER: [Self; 2] = [Self::ByName, Self::ByType];
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ByName => "name",
            Self::ByType => "type",
        })
    }
}

/// A service found for an identifier.
#[derive(Debug, Clone)]
pub struct ResolvedService {
    /// The identifier as written in the configuration.
    pub identifier: String,
    /// Which lookup matched.
    pub lookup: Lookup,
    /// The service instance.
    pub service: Service,
}

/// Resolves identifiers against a shared [`Container`].
#[derive(Debug, Clone)]
pub struct ServiceResolver {
    container: Arc<Container>,
}

impl ServiceResolver {
    /// Creates a resolver over a container.
    #[must_use]
    pub fn new(container: Arc<Container>) -> Self {
        Self { container }
    }

    /// Returns the underlying container.
    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Resolves an identifier by name, falling back to type name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::ServiceNotFound`] if neither lookup matches.
    pub fn resolve(&self, identifier: &str) -> ServiceResult<ResolvedService> {
        for lookup in Lookup::ORDER {
            let found = match lookup {
                Lookup::ByName => self.container.get_by_name(identifier),
                Lookup::ByType => self.container.get_by_type(identifier),
            };
            if let Some(service) = found {
                tracing::trace!(identifier, %lookup, type_name = service.type_name(), "service resolved");
                return Ok(ResolvedService {
                    identifier: identifier.to_string(),
                    lookup,
                    service,
                });
            }
        }
        Err(ServiceError::not_found(identifier))
    }

    /// Resolves an identifier that must name a route target.
    ///
    /// # Errors
    ///
    /// Fails if the identifier is unknown or the service is not a route.
    pub fn resolve_route(&self, identifier: &str) -> ServiceResult<Arc<dyn Route>> {
        let resolved = self.resolve(identifier)?;
        let actual = resolved.service.kind();
        resolved
            .service
            .into_route()
            .ok_or_else(|| ServiceError::invalid_type(identifier, ServiceKind::Route, actual))
    }

    /// Resolves an identifier that must name a middleware.
    ///
    /// # Errors
    ///
    /// Fails if the identifier is unknown or the service is not a middleware.
    pub fn resolve_middleware(&self, identifier: &str) -> ServiceResult<Arc<dyn Middleware>> {
        let resolved = self.resolve(identifier)?;
        let actual = resolved.service.kind();
        resolved
            .service
            .into_middleware()
            .ok_or_else(|| ServiceError::invalid_type(identifier, ServiceKind::Middleware, actual))
    }

    /// Resolves an identifier that must name an error handler.
    ///
    /// # Errors
    ///
    /// Fails if the identifier is unknown or the service is not an error handler.
    pub fn resolve_error_handler(&self, identifier: &str) -> ServiceResult<Arc<dyn ErrorHandler>> {
        let resolved = self.resolve(identifier)?;
        let actual = resolved.service.kind();
        resolved.service.into_error_handler().ok_or_else(|| {
            ServiceError::invalid_type(identifier, ServiceKind::ErrorHandler, actual)
        })
    }
}
