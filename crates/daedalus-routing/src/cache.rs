//! Process-shared storage for filtered route configurations.

use daedalus_config::RouteConfiguration;
use dashmap::DashMap;
use std::fmt;

/// Key a filtered route configuration is stored under.
#[must_use]
pub fn cache_key(api_name: &str) -> String {
    format!("filtered_routes.{api_name}")
}

/// Keyed store for filtered route configurations.
///
/// Entries never expire. Concurrent stores to the same key are last write
/// wins.
pub trait RouteCache: Send + Sync {
    /// Returns `true` if `key` holds a value.
    fn exists(&self, key: &str) -> bool;

    /// Returns the value stored under `key`.
    fn fetch(&self, key: &str) -> Option<RouteConfiguration>;

    /// Stores `routes` under `key`.
    fn store(&self, key: &str, routes: RouteConfiguration);
}

/// In-memory [`RouteCache`] shared by every clone of its `Arc`.
#[derive(Default)]
pub struct InMemoryRouteCache {
    entries: DashMap<String, RouteConfiguration>,
}

impl InMemoryRouteCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl RouteCache for InMemoryRouteCache {
    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn fetch(&self, key: &str) -> Option<RouteConfiguration> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn store(&self, key: &str, routes: RouteConfiguration) {
        self.entries.insert(key.to_string(), routes);
    }
}

impl fmt::Debug for InMemoryRouteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("InMemoryRouteCache")
            .field("keys", &keys)
            .finish()
    }
}
