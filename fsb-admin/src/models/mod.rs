mod bot;
mod file_record;
mod setting;
mod stats;

pub use bot::{Bot, NewBot};
pub use file_record::{FilePage, FileRecord, NewFileRecord, DEFAULT_PAGE_LIMIT};
pub use setting::{Setting, DEFAULT_SETTINGS, MAX_CACHE_SIZE_GB};
pub use stats::{CacheMetricsStatus, Stats};
