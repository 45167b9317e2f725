//! The API definition.
//!
//! This module provides [`ApiDefinition`], the root of the configuration
//! an application is built from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ConfigError, Handlers, LoggingConfig, Settings};

/// `apiNamespace → routePattern → httpMethod → route entry`, kept as raw
/// values so disabled entries and misspelled keys reach the registrar.
pub type RouteConfiguration = Map<String, Value>;

/// Complete application configuration.
///
/// # Example
///
/// ```
/// use daedalus_config::ApiDefinition;
///
/// let definition: ApiDefinition = serde_json::from_value(serde_json::json!({
///     "routes": {
///         "new-api/2.0": {
///             "channels": {
///                 "GET": { "service": "app.listChannels", "middlewareGroups": ["auth"] }
///             }
///         }
///     },
///     "middlewareGroups": { "auth": ["app.goldenKeyAuth"] }
/// }))
/// .unwrap();
///
/// assert!(definition.validate().is_ok());
/// assert_eq!(definition.api_names().collect::<Vec<_>>(), vec!["new-api/2.0"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApiDefinition {
    /// Route configuration.
    #[serde(default)]
    pub routes: RouteConfiguration,

    /// `groupName → [serviceIdentifier]`.
    #[serde(default)]
    pub middleware_groups: IndexMap<String, Vec<String>>,

    /// Middleware wrapping the whole application.
    #[serde(default)]
    pub before_request_middlewares: Vec<String>,

    /// Middleware running for every request, inside the before-request ones.
    #[serde(default)]
    pub before_route_middlewares: Vec<String>,

    /// Middleware appended to every registered route.
    #[serde(default)]
    pub after_route_middlewares: Vec<String>,

    /// Error handler identifiers.
    #[serde(default)]
    pub handlers: Handlers,

    /// Registration settings.
    #[serde(default)]
    pub settings: Settings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ApiDefinition {
    /// Returns the configured API names in definition order.
    pub fn api_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Validate the configuration.
    ///
    /// Route entries are not checked here; the registrar validates them
    /// while registering.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The API prefix is set but does not start with `/`
    /// - A middleware or handler identifier is empty
    /// - An API namespace does not map to a table of route patterns
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.settings.api_prefix;
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "settings.apiPrefix",
                format!("must start with '/': {prefix}"),
            ));
        }

        let lists = [
            ("beforeRequestMiddlewares", &self.before_request_middlewares),
            ("beforeRouteMiddlewares", &self.before_route_middlewares),
            ("afterRouteMiddlewares", &self.after_route_middlewares),
        ];
        for (field, identifiers) in lists {
            check_identifiers(field, identifiers)?;
        }
        for (group, identifiers) in &self.middleware_groups {
            check_identifiers(&format!("middlewareGroups.{group}"), identifiers)?;
        }

        let handlers = [
            ("handlers.notFound", &self.handlers.not_found),
            ("handlers.notAllowed", &self.handlers.not_allowed),
            ("handlers.error", &self.handlers.error),
        ];
        for (field, identifier) in handlers {
            if identifier.as_deref().is_some_and(|id| id.trim().is_empty()) {
                return Err(ConfigError::invalid_value(field, "identifier is empty"));
            }
        }

        for (api, patterns) in &self.routes {
            if !patterns.is_object() {
                return Err(ConfigError::invalid_value(
                    format!("routes.{api}"),
                    "expected a table of route patterns",
                ));
            }
        }

        Ok(())
    }
}

fn check_identifiers(field: &str, identifiers: &[String]) -> Result<(), ConfigError> {
    if let Some(index) = identifiers.iter().position(|id| id.trim().is_empty()) {
        return Err(ConfigError::invalid_value(
            format!("{field}[{index}]"),
            "identifier is empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_definition_is_valid() {
        let definition = ApiDefinition::default();
        assert!(definition.validate().is_ok());
        assert!(definition.routes.is_empty());
    }

    #[test]
    fn test_prefix_must_start_with_slash() {
        let mut definition = ApiDefinition::default();
        definition.settings.api_prefix = "api".to_string();
        let err = definition.validate().unwrap_err();
        assert!(err.to_string().contains("settings.apiPrefix"));

        definition.settings.api_prefix = "/api".to_string();
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let mut definition = ApiDefinition::default();
        definition
            .middleware_groups
            .insert("auth".to_string(), vec!["app.auth".to_string(), " ".to_string()]);
        let err = definition.validate().unwrap_err();
        assert!(err.to_string().contains("middlewareGroups.auth[1]"));
    }

    #[test]
    fn test_namespace_must_be_a_table() {
        let definition: ApiDefinition =
            serde_json::from_value(json!({"routes": {"chat/1.0": "disabled"}})).unwrap();
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let result: Result<ApiDefinition, _> =
            serde_json::from_value(json!({"route": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_route_entries_stay_raw() {
        let definition: ApiDefinition = serde_json::from_value(json!({
            "routes": {
                "chat/1.0": {
                    "brand/{brandId}": {
                        "GET": {"service": "app.brand", "midleware": ["typo"]},
                        "POST": false
                    }
                }
            }
        }))
        .unwrap();

        let entry = &definition.routes["chat/1.0"]["brand/{brandId}"];
        assert_eq!(entry["GET"]["midleware"], json!(["typo"]));
        assert_eq!(entry["POST"], json!(false));
    }
}
