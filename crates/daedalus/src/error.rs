//! Application bootstrap errors.

use daedalus_config::ConfigError;
use daedalus_core::ServiceError;
use daedalus_routing::RegistrationError;
use daedalus_telemetry::TelemetryError;
use thiserror::Error;

/// Result type alias using [`ApplicationError`].
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Errors raised while building an [`Application`](crate::Application).
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A middleware, group or handler identifier did not resolve.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A route could not be registered.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
