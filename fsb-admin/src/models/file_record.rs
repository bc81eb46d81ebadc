use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for file listings
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Metadata about a processed file and its generated download link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub bot_id: String,
    pub file_id: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub download_count: i64,
}

/// Input from the upstream file processor
#[derive(Debug, Clone, Deserialize)]
pub struct NewFileRecord {
    pub bot_id: String,
    pub file_id: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub download_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Pagination window for file listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePage {
    pub limit: i64,
    pub offset: i64,
}

impl Default for FilePage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl FilePage {
    /// Negative values clamp to zero
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(0),
            offset: offset.max(0),
        }
    }

    /// Build from raw query-string values; anything non-numeric falls back
    /// to the default for that field.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let defaults = Self::default();
        let parse = |raw: Option<&str>, fallback: i64| {
            raw.and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(fallback)
        };
        Self::new(parse(limit, defaults.limit), parse(offset, defaults.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_and_clamping() {
        assert_eq!(FilePage::from_query(None, None), FilePage { limit: 50, offset: 0 });
        assert_eq!(
            FilePage::from_query(Some("10"), Some("20")),
            FilePage { limit: 10, offset: 20 }
        );
        assert_eq!(FilePage::from_query(Some("-5"), Some("-1")), FilePage { limit: 0, offset: 0 });
        assert_eq!(FilePage::from_query(Some("ten"), Some("")), FilePage { limit: 50, offset: 0 });
    }
}
