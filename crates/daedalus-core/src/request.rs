//! Request accessors.
//!
//! [`RequestExt`] reads the values routes need most often: path arguments
//! captured by the router, query parameters, typed attributes stored by
//! middleware and the decoded JSON body. Absent values are reported with a
//! [`RequestError`] naming what was missing.

use crate::arguments::RouteArguments;
use crate::error::{RequestError, RequestResult};
use crate::types::{BoxFuture, Request};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use http_body_util::{BodyExt, Full};
use serde_json::{Map, Value};
use std::any::type_name;

/// `2024-05-01T10:00:00+02:00`, no fractional seconds, numeric offset.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Top-level fields of a JSON request body.
///
/// A body that decodes to anything but an object has no fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody {
    fields: Map<String, Value>,
}

impl JsonBody {
    /// Decodes a body.
    pub fn from_slice(bytes: &[u8]) -> RequestResult<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| RequestError::InvalidJsonBody {
                reason: err.to_string(),
            })?;
        Ok(Self {
            fields: match value {
                Value::Object(fields) => fields,
                _ => Map::new(),
            },
        })
    }

    /// Returns a field, failing when the key is absent.
    ///
    /// A key present with a `null` value is returned as `null`.
    pub fn field(&self, name: &str) -> RequestResult<&Value> {
        self.fields
            .get(name)
            .ok_or_else(|| RequestError::RequestFieldMissing {
                field: name.to_string(),
            })
    }

    /// Returns a field or `default` when the key is absent.
    #[must_use]
    pub fn optional_field<'a>(&'a self, name: &str, default: &'a Value) -> &'a Value {
        self.fields.get(name).unwrap_or(default)
    }

    /// Whether the key is present, whatever its value.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns all fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Accessors on [`Request`].
///
/// # Example
///
/// ```
/// use daedalus_core::{RequestExt, RouteArguments};
///
/// let mut request: daedalus_core::Request = http::Request::builder()
///     .uri("/chat/1.0/channels/42?since=2024-05-01T10:00:00%2B02:00")
///     .body(Default::default())
///     .unwrap();
/// request
///     .extensions_mut()
///     .insert(RouteArguments::from_iter([("channelId", " 42 ")]));
///
/// assert_eq!(request.required_argument("channelId").unwrap(), "42");
/// assert_eq!(
///     request.date_time_query_param("since").unwrap().to_rfc3339(),
///     "2024-05-01T10:00:00+02:00"
/// );
/// ```
pub trait RequestExt {
    /// Arguments captured from the matched path, if the request was routed.
    fn route_arguments(&self) -> Option<&RouteArguments>;

    /// Returns a path argument with surrounding whitespace removed.
    ///
    /// Fails with `RouteArgumentMissing` when the argument is absent or blank.
    fn required_argument(&self, name: &str) -> RequestResult<&str>;

    /// Returns a decoded query parameter; the last one wins on repeats.
    fn query_param(&self, key: &str) -> RequestResult<Option<String>>;

    /// Like [`query_param`](Self::query_param), failing with
    /// `QueryParamMissing` when the parameter is absent.
    fn required_query_param(&self, key: &str) -> RequestResult<String>;

    /// Parses a query parameter written in [`DATE_TIME_FORMAT`].
    ///
    /// The value must format back to exactly the same string, so
    /// `2024-02-30T00:00:00+00:00` or a trailing `Z` are rejected.
    fn date_time_query_param(&self, key: &str) -> RequestResult<DateTime<FixedOffset>>;

    /// Returns a clone of a value stored in the request extensions.
    fn required_attribute<T: Clone + Send + Sync + 'static>(&self) -> RequestResult<T>;

    /// Decodes the body as JSON.
    ///
    /// The result is cached in the request extensions and the body bytes
    /// are put back, so later readers see the same body.
    fn decoded_json_body(&mut self) -> BoxFuture<'_, RequestResult<JsonBody>>;
}

impl RequestExt for Request {
    fn route_arguments(&self) -> Option<&RouteArguments> {
        self.extensions().get::<RouteArguments>()
    }

    fn required_argument(&self, name: &str) -> RequestResult<&str> {
        self.route_arguments()
            .and_then(|arguments| arguments.get(name))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| RequestError::RouteArgumentMissing {
                argument: name.to_string(),
            })
    }

    fn query_param(&self, key: &str) -> RequestResult<Option<String>> {
        let query = self.uri().query().unwrap_or_default();
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query).map_err(|err| RequestError::InvalidQueryString {
                reason: err.to_string(),
            })?;
        Ok(pairs
            .into_iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value))
    }

    fn required_query_param(&self, key: &str) -> RequestResult<String> {
        self.query_param(key)?
            .ok_or_else(|| RequestError::QueryParamMissing {
                key: key.to_string(),
            })
    }

    fn date_time_query_param(&self, key: &str) -> RequestResult<DateTime<FixedOffset>> {
        let raw = self.required_query_param(key)?;
        DateTime::parse_from_str(&raw, DATE_TIME_FORMAT)
            .ok()
            .filter(|parsed| parsed.format(DATE_TIME_FORMAT).to_string() == raw)
            .ok_or(RequestError::InvalidDateTime {
                key: key.to_string(),
                value: raw,
            })
    }

    fn required_attribute<T: Clone + Send + Sync + 'static>(&self) -> RequestResult<T> {
        self.extensions()
            .get::<T>()
            .cloned()
            .ok_or_else(|| RequestError::RequestAttributeMissing {
                attribute: type_name::<T>().to_string(),
            })
    }

    fn decoded_json_body(&mut self) -> BoxFuture<'_, RequestResult<JsonBody>> {
        Box::pin(async move {
            if let Some(cached) = self.extensions().get::<JsonBody>() {
                return Ok(cached.clone());
            }

            let bytes: Bytes = match std::mem::take(self.body_mut()).collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };
            *self.body_mut() = Full::new(bytes.clone());

            let body = JsonBody::from_slice(&bytes)?;
            self.extensions_mut().insert(body.clone());
            Ok(body)
        })
    }
}
