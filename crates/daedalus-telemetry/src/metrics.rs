//! Route registration metrics.
//!
//! Counters are emitted through the `metrics` facade. No exporter is
//! installed here; the hosting application chooses one.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    /// Routes mapped into the router, by API namespace.
    pub const ROUTES_REGISTERED: &str = "daedalus_routes_registered_total";

    /// Route entries skipped as disabled, by reason.
    pub const ROUTE_ENTRIES_SKIPPED: &str = "daedalus_route_entries_skipped_total";

    /// Filtered route sets served from the route cache.
    pub const ROUTE_CACHE_HITS: &str = "daedalus_route_cache_hits_total";

    /// Filtered route sets written to the route cache.
    pub const ROUTE_CACHE_STORES: &str = "daedalus_route_cache_stores_total";
}

/// Registers descriptions for every Daedalus metric.
pub fn describe_metrics() {
    describe_counter!(names::ROUTES_REGISTERED, "Routes mapped into the router");
    describe_counter!(
        names::ROUTE_ENTRIES_SKIPPED,
        "Route entries skipped because they are disabled"
    );
    describe_counter!(
        names::ROUTE_CACHE_HITS,
        "Filtered route sets served from the route cache"
    );
    describe_counter!(
        names::ROUTE_CACHE_STORES,
        "Filtered route sets written to the route cache"
    );
}

/// Records one mapped route.
pub fn record_route_registered(api_namespace: &str) {
    counter!(names::ROUTES_REGISTERED, "api" => api_namespace.to_string()).increment(1);
}

/// Records one skipped route entry.
///
/// `reason` is one of `not_a_map`, `empty`, `no_service`.
pub fn record_entry_skipped(reason: &'static str) {
    counter!(names::ROUTE_ENTRIES_SKIPPED, "reason" => reason).increment(1);
}

/// Records a route cache hit.
pub fn record_cache_hit(api_name: &str) {
    counter!(names::ROUTE_CACHE_HITS, "api" => api_name.to_string()).increment(1);
}

/// Records a route cache store.
pub fn record_cache_store(api_name: &str) {
    counter!(names::ROUTE_CACHE_STORES, "api" => api_name.to_string()).increment(1);
}
