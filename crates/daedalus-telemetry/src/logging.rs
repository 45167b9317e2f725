//! Structured logging for Daedalus.
//!
//! JSON output for production and pretty output for development, both
//! built on `tracing-subscriber` with an `EnvFilter`.
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::info!(routes = 42, "route registration complete");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether a subscriber is installed at all.
    pub enabled: bool,

    /// Filter directive (e.g. `"info"`, `"daedalus_routing=debug,info"`).
    pub level: String,

    /// JSON lines instead of the pretty multi-line format.
    pub json_format: bool,

    /// ANSI colors, pretty format only.
    pub ansi: bool,

    /// Emit an event when a span closes.
    pub span_close_events: bool,

    /// Source file and line of each event.
    pub file_line_info: bool,

    /// Module path of each event.
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Pretty, colored, verbose output for local runs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            ansi: true,
            span_close_events: true,
            file_line_info: true,
            ..Self::production()
        }
    }

    /// JSON lines at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            ansi: false,
            span_close_events: false,
            file_line_info: false,
            include_target: true,
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_close_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    // Exactly one of the two layers is present.
    let json = config.json_format.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(config.span_events())
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
    });
    let pretty = (!config.json_format).then(|| {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(config.ansi)
            .with_span_events(config.span_events())
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|err| TelemetryError::LoggingInit(err.to_string()))
}

/// Parses a filter directive such as `"daedalus_routing=debug,info"`.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` naming the bad directive.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|err| {
        TelemetryError::LoggingInit(format!("invalid log filter `{directive}`: {err}"))
    })
}

/// Standard log field names.
pub mod fields {
    /// API namespace (e.g. `new-api/2.0`).
    pub const API_NAMESPACE: &str = "api_namespace";

    /// Route pattern as configured.
    pub const ROUTE_PATTERN: &str = "route_pattern";

    /// Route name.
    pub const ROUTE_NAME: &str = "route_name";

    /// HTTP method field name.
    pub const HTTP_METHOD: &str = "http.method";

    /// HTTP path field name.
    pub const HTTP_PATH: &str = "http.path";

    /// Service identifier from the configuration.
    pub const SERVICE: &str = "service";

    /// Error field name.
    pub const ERROR: &str = "error";
}
