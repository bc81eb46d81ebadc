use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::gateway::DEFAULT_STATS_INTERVAL;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub static_dir: PathBuf,
    pub stats_interval: Duration,
    pub admin_token: Option<String>,
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let stats_interval_secs: u64 = parse_or(
            &lookup,
            "ADMIN_STATS_INTERVAL_SECS",
            DEFAULT_STATS_INTERVAL.as_secs(),
        );
        let stats_interval = if stats_interval_secs == 0 {
            log::warn!("ADMIN_STATS_INTERVAL_SECS must be at least 1, using default");
            DEFAULT_STATS_INTERVAL
        } else {
            Duration::from_secs(stats_interval_secs)
        };

        Self {
            host: lookup("ADMIN_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "ADMIN_PORT", 8081),
            database_url: lookup("ADMIN_DATABASE_URL").unwrap_or_else(|| "./admin.db".to_string()),
            static_dir: lookup("ADMIN_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_static_dir),
            stats_interval,
            admin_token: lookup("ADMIN_TOKEN").filter(|t| !t.trim().is_empty()),
            cache_dir: lookup("ADMIN_CACHE_DIR")
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} has invalid value {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

// Check ./static first, then ./fsb-admin/static (running from the workspace root)
fn default_static_dir() -> PathBuf {
    if Path::new("./static").exists() {
        PathBuf::from("./static")
    } else if Path::new("./fsb-admin/static").exists() {
        PathBuf::from("./fsb-admin/static")
    } else {
        PathBuf::from("./static")
    }
}
