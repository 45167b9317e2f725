//! Observability for Daedalus.
//!
//! - **Logging**: structured logs through `tracing-subscriber`, JSON in
//!   production and pretty output in development
//! - **Metrics**: route registration counters through the `metrics` facade
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `daedalus_routes_registered_total` | Counter | `api` | Routes mapped into the router |
//! | `daedalus_route_entries_skipped_total` | Counter | `reason` | Disabled route entries |
//! | `daedalus_route_cache_hits_total` | Counter | `api` | Filtered route sets read from cache |
//! | `daedalus_route_cache_stores_total` | Counter | `api` | Filtered route sets written to cache |
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! daedalus_telemetry::metrics::describe_metrics();
//! ```

#![doc(html_root_url = "https://docs.rs/daedalus-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};
pub use metrics::names as metric_names;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
