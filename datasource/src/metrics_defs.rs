//! Metrics definitions for the data source layer.

use shared::metrics_defs::{MetricDef, MetricType};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "cache.hit",
    metric_type: MetricType::Counter,
    description: "Number of document reads served from the cache",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "cache.miss",
    metric_type: MetricType::Counter,
    description: "Number of document reads with no usable cache entry",
};

pub const CACHE_EXPIRED: MetricDef = MetricDef {
    name: "cache.expired",
    metric_type: MetricType::Counter,
    description: "Number of cache entries discarded because their TTL lapsed",
};

pub const CACHE_PURGED: MetricDef = MetricDef {
    name: "cache.purged",
    metric_type: MetricType::Counter,
    description: "Number of corrupt or invalid cache entries removed",
};

pub const FETCH_REQUESTS: MetricDef = MetricDef {
    name: "fetch.requests",
    metric_type: MetricType::Counter,
    description: "Number of HTTP document fetches issued",
};

pub const FETCH_ERRORS: MetricDef = MetricDef {
    name: "fetch.errors",
    metric_type: MetricType::Counter,
    description: "Number of document fetches that failed",
};

pub const ALL_METRICS: &[MetricDef] = &[
    CACHE_HIT,
    CACHE_MISS,
    CACHE_EXPIRED,
    CACHE_PURGED,
    FETCH_REQUESTS,
    FETCH_ERRORS,
];
