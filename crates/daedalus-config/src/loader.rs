//! Layered configuration loader.
//!
//! This module provides the [`ConfigLoader`] for building an
//! [`ApiDefinition`] from several sources: files, strings, in-memory values
//! and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::merge::merge_layers;
use crate::{ApiDefinition, ConfigError, LogFormat};

/// Text formats a layer can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML. Cannot express `null`, so it cannot unset keys.
    Toml,
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl ConfigFormat {
    /// Determines the format from a name or file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for anything else.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::unsupported_format(name)),
        }
    }

    fn parse(self, content: &str) -> Result<Value, ConfigError> {
        Ok(match self {
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

/// Configuration loader with layered approach.
///
/// Layers are applied in the order they are added:
/// 1. Each layer is deep-merged over the previous ones
/// 2. Keys set to `null` by any layer are removed
/// 3. Environment variables (`PREFIX__SECTION__KEY`) override settings
/// 4. The result is validated
///
/// # Example
///
/// ```no_run
/// use daedalus_config::ConfigLoader;
///
/// # fn main() -> Result<(), daedalus_config::ConfigError> {
/// let definition = ConfigLoader::new()
///     .with_file("config/routes.yaml")?
///     .with_optional_file("config/routes.local.yaml")?
///     .with_env_prefix("DAEDALUS")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    layers: Vec<Value>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer from a file.
    ///
    /// The format is determined by the extension: `.toml`, `.json`,
    /// `.yaml` or `.yml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The extension is not supported
    /// - The content does not parse or is not a mapping
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let format = ConfigFormat::from_name(extension)?;

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.with_value(format.parse(&content)?)
    }

    /// Add a layer from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Add a layer from a string.
    ///
    /// # Arguments
    ///
    /// * `content` - Configuration content
    /// * `format` - `"toml"`, `"json"` or `"yaml"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the format is unknown or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use daedalus_config::ConfigLoader;
    ///
    /// let base = r#"
    /// routes:
    ///   new-api/2.0:
    ///     channels:
    ///       GET: { service: app.listChannels }
    ///       POST: { service: app.createChannel }
    /// "#;
    /// let local = r#"
    /// routes:
    ///   new-api/2.0:
    ///     channels:
    ///       POST: ~
    /// "#;
    ///
    /// let definition = ConfigLoader::new()
    ///     .with_string(base, "yaml")
    ///     .unwrap()
    ///     .with_string(local, "yaml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// let channels = &definition.routes["new-api/2.0"]["channels"];
    /// assert!(channels.get("POST").is_none());
    /// assert!(channels.get("GET").is_some());
    /// ```
    pub fn with_string(self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_name(format)?;
        self.with_value(format.parse(content)?)
    }

    /// Add an in-memory layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotAMapping` if the value is not a mapping.
    pub fn with_value(mut self, value: Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::NotAMapping {
                found: kind_of(&value),
            });
        }
        self.layers.push(value);
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`, e.g.
    /// with prefix `DAEDALUS`:
    /// - `DAEDALUS__SETTINGS__REGISTER_ONLY_NECESSARY_ROUTES=true`
    /// - `DAEDALUS__SETTINGS__ROUTE_API_NAMES_ALWAYS_INCLUDE=healthcheck,status`
    /// - `DAEDALUS__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file into the process environment, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvParseError` if the file exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(err) if err.not_found() => Ok(self),
            Err(err) => Err(ConfigError::env_parse_error(".env", err.to_string())),
        }
    }

    /// Merge the layers and remove unset keys, without env overrides or
    /// validation.
    #[must_use]
    pub fn load_value(self) -> Value {
        merge_layers(self.layers)
    }

    /// Finalize and return the API definition.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The merged layers do not describe an API definition
    /// - Environment variable parsing fails
    /// - Validation fails
    pub fn load(mut self) -> Result<ApiDefinition, ConfigError> {
        let prefix = self.env_prefix.take();
        let mut definition: ApiDefinition =
            serde_json::from_value(self.load_value()).map_err(ConfigError::InvalidStructure)?;

        if let Some(prefix) = prefix {
            apply_env_overrides(&mut definition, &prefix)?;
        }

        definition.validate()?;
        Ok(definition)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn apply_env_overrides(definition: &mut ApiDefinition, prefix: &str) -> Result<(), ConfigError> {
    for (key, value) in env::vars().filter(|(k, _)| k.starts_with(prefix)) {
        apply_env_var(definition, &key, &value, prefix)?;
    }
    Ok(())
}

// Apply a single environment variable
fn apply_env_var(
    definition: &mut ApiDefinition,
    key: &str,
    value: &str,
    prefix: &str,
) -> Result<(), ConfigError> {
    let Some(key_without_prefix) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__"))
    else {
        return Ok(());
    };

    let parts: Vec<&str> = key_without_prefix.split("__").collect();
    let settings = &mut definition.settings;
    let logging = &mut definition.logging;

    match parts.as_slice() {
        ["SETTINGS", "DETECT_TYPOS_IN_ROUTE_CONFIGURATION"] => {
            settings.detect_typos_in_route_configuration = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }
        ["SETTINGS", "REGISTER_ONLY_NECESSARY_ROUTES"] => {
            settings.register_only_necessary_routes = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }
        ["SETTINGS", "USE_ROUTE_CACHE" | "USE_APCU_CACHE"] => {
            settings.use_route_cache = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }
        ["SETTINGS", "ROUTE_API_NAMES_ALWAYS_INCLUDE"] => {
            settings.route_api_names_always_include = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        ["SETTINGS", "API_PREFIX"] => {
            settings.api_prefix = value.to_string();
        }

        ["LOGGING", "ENABLED"] => {
            logging.enabled = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }
        ["LOGGING", "LEVEL"] => {
            logging.level = value.to_string();
        }
        ["LOGGING", "FORMAT"] => {
            logging.format = match value.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::env_parse_error(
                        key,
                        "expected 'json' or 'pretty'",
                    ))
                }
            };
        }
        ["LOGGING", "ANSI_ENABLED"] => {
            logging.ansi_enabled = parse_bool(value)
                .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
        }

        // Unknown key - ignore
        _ => {}
    }

    Ok(())
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
