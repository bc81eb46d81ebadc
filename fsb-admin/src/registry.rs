//! Registry service - business logic over the store
//!
//! Every call reads the store fresh; nothing is cached between requests.

use std::sync::Arc;

use crate::cache_metrics::CacheMetrics;
use crate::clock::{Clock, IdGenerator};
use crate::db::{storage_precision, Database};
use crate::error::{AdminError, AdminResult};
use crate::models::{
    Bot, CacheMetricsStatus, FilePage, FileRecord, MAX_CACHE_SIZE_GB, NewBot, NewFileRecord,
    Setting, Stats,
};

pub struct RegistryService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    cache_metrics: Option<Arc<dyn CacheMetrics>>,
}

impl RegistryService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            db,
            clock,
            ids,
            cache_metrics: None,
        }
    }

    /// Report real cache figures in stats instead of "unknown"
    pub fn with_cache_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.cache_metrics = Some(metrics);
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Register a bot. The registry assigns id, timestamps and the active flag.
    pub fn add_bot(&self, input: NewBot) -> AdminResult<Bot> {
        input.validate()?;

        let now = storage_precision(self.clock.now());
        let bot = Bot {
            id: self.ids.next_id(),
            token: input.token,
            username: input.username,
            client_name: input.client_name,
            channel_id: input.channel_id,
            channel_name: input.channel_name,
            description: input.description,
            is_active: true,
            created_at: now,
            last_active: now,
        };

        self.db.insert_bot(&bot)?;
        log::info!("Registered bot {} (@{})", bot.id, bot.username);
        Ok(bot)
    }

    pub fn list_bots(&self) -> AdminResult<Vec<Bot>> {
        Ok(self.db.list_bots()?)
    }

    /// Store errors propagate; an empty page only means no rows matched
    pub fn list_files(&self, page: FilePage) -> AdminResult<Vec<FileRecord>> {
        Ok(self.db.list_files(page)?)
    }

    /// Record a file produced by the upstream processor
    pub fn record_file(&self, input: NewFileRecord) -> AdminResult<FileRecord> {
        if input.bot_id.trim().is_empty() {
            return Err(AdminError::InvalidInput("bot_id is required".to_string()));
        }
        if input.file_size < 0 {
            return Err(AdminError::InvalidInput("file_size must not be negative".to_string()));
        }

        let record = FileRecord {
            id: uuid::Uuid::new_v4().to_string(),
            bot_id: input.bot_id,
            file_id: input.file_id,
            file_name: input.file_name,
            file_size: input.file_size,
            file_type: input.file_type,
            download_url: input.download_url,
            created_at: storage_precision(self.clock.now()),
            expires_at: storage_precision(input.expires_at),
            download_count: 0,
        };

        self.db.insert_file(&record)?;
        Ok(record)
    }

    /// Returns the new download count
    pub fn increment_download_count(&self, file_id: &str) -> AdminResult<i64> {
        self.db
            .increment_download_count(file_id)?
            .ok_or_else(|| AdminError::NotFound(format!("file {} not found", file_id)))
    }

    pub fn list_settings(&self) -> AdminResult<Vec<Setting>> {
        Ok(self.db.list_settings()?)
    }

    pub fn update_setting(&self, key: &str, value: &str) -> AdminResult<Setting> {
        if key.trim().is_empty() {
            return Err(AdminError::InvalidInput("setting key is required".to_string()));
        }
        Ok(self.db.upsert_setting(key, value)?)
    }

    pub fn get_stats(&self) -> AdminResult<Stats> {
        let now = self.clock.now();
        let active_bots = self.db.count_active_bots()?;
        let total_files = self.db.count_files()?;
        let active_links = self.db.count_active_links(&now)?;

        let mut stats = Stats {
            active_bots,
            total_files,
            active_links,
            cache_size_gb: None,
            cache_free_space_percent: None,
            cache_metrics: CacheMetricsStatus::Unknown,
        };

        if let Some(metrics) = &self.cache_metrics {
            let max_gb = self.max_cache_size_gb()?;
            match metrics.measure(max_gb) {
                Ok(usage) => {
                    stats.cache_size_gb = Some(usage.size_gb);
                    stats.cache_free_space_percent = Some(usage.free_space_percent);
                    stats.cache_metrics = CacheMetricsStatus::Measured;
                }
                Err(e) => log::warn!("Failed to measure cache usage: {}", e),
            }
        }

        Ok(stats)
    }

    /// [`get_stats`](Self::get_stats) on the blocking pool, since measuring
    /// the cache walks a directory tree
    pub async fn load_stats(self: &Arc<Self>) -> AdminResult<Stats> {
        let registry = Arc::clone(self);
        tokio::task::spawn_blocking(move || registry.get_stats())
            .await
            .map_err(|e| AdminError::StoreUnavailable(format!("stats task failed: {}", e)))?
    }

    fn max_cache_size_gb(&self) -> AdminResult<f64> {
        let raw = self.db.get_setting(MAX_CACHE_SIZE_GB)?;
        Ok(raw
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or_else(|| {
                log::warn!("Setting {} missing or not a number, assuming 0", MAX_CACHE_SIZE_GB);
                0.0
            }))
    }
}
