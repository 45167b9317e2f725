//! URL paths and route names from namespace and pattern.

/// Joins API namespaces and route patterns into URL paths.
///
/// Every part is trimmed of surrounding slashes and re-joined with single
/// slashes, so `("/new-api/2.0/", "/channels/")` and
/// `("new-api/2.0", "channels")` give the same path.
///
/// # Example
///
/// ```
/// use daedalus_routing::UrlPatternResolver;
///
/// let resolver = UrlPatternResolver::new("/api");
/// assert_eq!(resolver.resolve("new-api/2.0/", "/channels"), "/api/new-api/2.0/channels");
/// assert_eq!(resolver.resolve_route_path("new-api/2.0/", "/channels"), "/new-api/2.0/channels");
/// assert_eq!(UrlPatternResolver::default().resolve("", ""), "/");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPatternResolver {
    api_prefix: String,
}

impl UrlPatternResolver {
    /// Creates a resolver prepending `api_prefix` to every URL.
    pub fn new(api_prefix: impl AsRef<str>) -> Self {
        Self {
            api_prefix: join(&[api_prefix.as_ref()]),
        }
    }

    /// Returns the normalized prefix, empty when none is set.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// The URL pattern the route is mapped on, prefix included.
    #[must_use]
    pub fn resolve(&self, api_namespace: &str, route_pattern: &str) -> String {
        let path = format!("{}{}", self.api_prefix, join(&[api_namespace, route_pattern]));
        if path.is_empty() {
            "/".to_string()
        } else {
            path
        }
    }

    /// The canonical route path, used as the default route name.
    ///
    /// It does not include the prefix, so route names stay stable when the
    /// prefix changes.
    #[must_use]
    pub fn resolve_route_path(&self, api_namespace: &str, route_pattern: &str) -> String {
        let path = join(&[api_namespace, route_pattern]);
        if path.is_empty() {
            "/".to_string()
        } else {
            path
        }
    }
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .fold(String::new(), |mut path, part| {
            path.push('/');
            path.push_str(part);
            path
        })
}
