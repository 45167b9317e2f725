//! Pruning the route configuration to the APIs a request can hit.

use crate::cache::{cache_key, RouteCache};
use daedalus_config::RouteConfiguration;
use daedalus_telemetry::metrics;
use std::fmt;
use std::sync::Arc;

/// Keeps only the APIs relevant to the current request URL.
///
/// An API is relevant when the URL path contains `/<apiName>/`, or when it
/// is listed as always included. Returning too many routes is harmless,
/// so without a URL nothing is filtered.
///
/// With caching enabled the filtered configuration is stored under
/// `filtered_routes.<apiName>` after every API the URL matches, and a
/// stored value for a matching API is returned as is, without looking at
/// the remaining APIs or the always-include list.
#[derive(Clone)]
pub struct NecessaryRoutesFilter {
    cache: Arc<dyn RouteCache>,
}

impl NecessaryRoutesFilter {
    /// Creates a filter using `cache` when caching is requested.
    #[must_use]
    pub fn new(cache: Arc<dyn RouteCache>) -> Self {
        Self { cache }
    }

    /// Returns the part of `all_routes` needed to serve `request_url`.
    #[must_use]
    pub fn get_routes(
        &self,
        request_url: Option<&str>,
        all_routes: &RouteConfiguration,
        use_cache: bool,
        always_include: &[String],
    ) -> RouteConfiguration {
        let Some(url) = request_url else {
            return all_routes.clone();
        };

        let path = url.split('?').next().unwrap_or_default();
        let mut filtered = RouteConfiguration::new();

        for (api_name, api_routes) in all_routes {
            let is_current = path.contains(&format!("/{api_name}/"));
            if !is_current && !always_include.contains(api_name) {
                continue;
            }

            let key = cache_key(api_name);
            if is_current && use_cache {
                if let Some(cached) = self.cache.fetch(&key) {
                    tracing::debug!(api = %api_name, "filtered routes served from cache");
                    metrics::record_cache_hit(api_name);
                    return cached;
                }
            }

            filtered.insert(api_name.clone(), api_routes.clone());

            if is_current && use_cache {
                self.cache.store(&key, filtered.clone());
                metrics::record_cache_store(api_name);
            }
        }

        tracing::debug!(
            url = %path,
            apis = ?filtered.keys().collect::<Vec<_>>(),
            "route configuration filtered"
        );
        filtered
    }
}

impl fmt::Debug for NecessaryRoutesFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NecessaryRoutesFilter").finish_non_exhaustive()
    }
}
