//! Configuration section types.

use daedalus_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// Registration behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    /// Reject route entry keys one edit away from a known key.
    #[serde(default = "default_true")]
    pub detect_typos_in_route_configuration: bool,

    /// Register only the APIs relevant to the current request URL.
    #[serde(default)]
    pub register_only_necessary_routes: bool,

    /// Memoize filtered routes in the route cache.
    #[serde(default, alias = "useApcuCache")]
    pub use_route_cache: bool,

    /// API names registered regardless of the request URL.
    #[serde(default)]
    pub route_api_names_always_include: Vec<String>,

    /// Prefix prepended to every route URL, e.g. `/api`.
    #[serde(default)]
    pub api_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detect_typos_in_route_configuration: true,
            register_only_necessary_routes: false,
            use_route_cache: false,
            route_api_names_always_include: Vec::new(),
            api_prefix: String::new(),
        }
    }
}

/// Error handler service identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Handlers {
    /// Handler for paths no route matches.
    #[serde(default)]
    pub not_found: Option<String>,

    /// Handler for matched paths with an unmapped method.
    #[serde(default)]
    pub not_allowed: Option<String>,

    /// Handler for errors returned by routes and middleware.
    #[serde(default)]
    pub error: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts this section into the subscriber configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            ansi: self.ansi_enabled,
            file_line_info: self.include_location,
            ..LogConfig::production()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
