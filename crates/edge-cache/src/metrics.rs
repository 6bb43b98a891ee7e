//! Cache counters.
//!
//! Recorded through the `metrics` facade; installing an exporter is up to the
//! embedding application.

pub fn record_cache_hit(tier: &'static str) {
    metrics::counter!("edge_cache_hits_total", "tier" => tier).increment(1);
}

pub fn record_cache_miss(tier: &'static str) {
    metrics::counter!("edge_cache_misses_total", "tier" => tier).increment(1);
}

pub fn record_invalidation(cache: &'static str) {
    metrics::counter!("edge_cache_invalidations_total", "cache" => cache).increment(1);
}
