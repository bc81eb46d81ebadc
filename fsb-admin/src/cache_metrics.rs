//! Cache usage measurement for the dashboard stats.
//!
//! The file cache itself belongs to the streaming service; this module only
//! looks at the directory it writes to.

use std::io;
use std::path::PathBuf;
use walkdir::WalkDir;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheUsage {
    pub size_gb: f64,
    pub free_space_percent: f64,
}

pub trait CacheMetrics: Send + Sync {
    /// Measure current usage against the configured ceiling
    fn measure(&self, max_cache_size_gb: f64) -> io::Result<CacheUsage>;
}

/// Sums the size of every regular file under a cache directory
pub struct DirectoryCacheMetrics {
    root: PathBuf,
}

impl DirectoryCacheMetrics {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CacheMetrics for DirectoryCacheMetrics {
    fn measure(&self, max_cache_size_gb: f64) -> io::Result<CacheUsage> {
        let mut total_bytes: u64 = 0;
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if entry.file_type().is_file() {
                total_bytes += entry.metadata()?.len();
            }
        }

        let size_gb = total_bytes as f64 / BYTES_PER_GB;
        Ok(CacheUsage {
            size_gb: round2(size_gb),
            free_space_percent: round2(free_percent(size_gb, max_cache_size_gb)),
        })
    }
}

fn free_percent(size_gb: f64, max_gb: f64) -> f64 {
    if max_gb <= 0.0 {
        return 0.0;
    }
    ((max_gb - size_gb) / max_gb * 100.0).clamp(0.0, 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
