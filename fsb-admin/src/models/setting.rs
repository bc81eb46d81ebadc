use serde::{Deserialize, Serialize};

/// Key of the cache size ceiling used for free-space reporting
pub const MAX_CACHE_SIZE_GB: &str = "max_cache_size_gb";

/// Settings seeded on startup when absent
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    ("cache_time_minutes", "15"),
    (MAX_CACHE_SIZE_GB, "10"),
    ("max_file_size_mb", "100"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}
