use serde::Serialize;

/// Whether the cache figures in [`Stats`] came from a real measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMetricsStatus {
    Measured,
    Unknown,
}

/// Aggregate dashboard counters. Cache figures are `null` when unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub active_bots: i64,
    pub total_files: i64,
    pub active_links: i64,
    pub cache_size_gb: Option<f64>,
    pub cache_free_space_percent: Option<f64>,
    pub cache_metrics: CacheMetricsStatus,
}
