//! Live stats broadcaster
//!
//! Each observer connection gets its own loop: wait for the tick, recompute
//! stats, push, repeat. The loop body is sequential, so a connection never
//! has more than one push in flight. A failed push ends the loop; a closed
//! observer is normal and is never retried.

pub mod actix_ws;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::registry::RegistryService;

/// Default push interval
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(5);

/// The observer is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkClosed;

/// Destination for serialized stats snapshots
#[async_trait(?Send)]
pub trait StatsSink {
    async fn push(&mut self, payload: String) -> Result<(), SinkClosed>;
}

/// Why an observer stream stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Observer sent a close frame or its inbound stream ended
    PeerClosed,
    /// An outbound push failed
    PushFailed,
}

pub struct StatsBroadcaster {
    registry: Arc<RegistryService>,
    interval: Duration,
}

impl StatsBroadcaster {
    pub fn new(registry: Arc<RegistryService>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Push a fresh stats snapshot every interval until a push fails.
    ///
    /// A stats query failure skips that tick; the observer keeps its
    /// connection and gets the next successful snapshot.
    pub async fn stream<S: StatsSink>(&self, sink: &mut S) -> StreamEnd {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let stats = match self.registry.load_stats().await {
                Ok(stats) => stats,
                Err(e) => {
                    log::warn!("Skipping live stats tick: {}", e);
                    continue;
                }
            };
            let payload = match serde_json::to_string(&stats) {
                Ok(payload) => payload,
                Err(e) => {
                    log::warn!("Failed to serialize live stats: {}", e);
                    continue;
                }
            };

            if sink.push(payload).await.is_err() {
                log::debug!("Live stats observer went away");
                return StreamEnd::PushFailed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, MonotonicIdGenerator};
    use crate::db::Database;
    use crate::models::NewBot;
    use chrono::{TimeZone, Utc};

    /// Records pushes; refuses every push after `accept` of them
    struct RecordingSink {
        accept: usize,
        pushes: Vec<(Instant, String)>,
        attempts: usize,
    }

    impl RecordingSink {
        fn accepting(accept: usize) -> Self {
            Self {
                accept,
                pushes: Vec::new(),
                attempts: 0,
            }
        }
    }

    #[async_trait(?Send)]
    impl StatsSink for RecordingSink {
        async fn push(&mut self, payload: String) -> Result<(), SinkClosed> {
            self.attempts += 1;
            if self.pushes.len() >= self.accept {
                return Err(SinkClosed);
            }
            self.pushes.push((Instant::now(), payload));
            Ok(())
        }
    }

    fn registry() -> Arc<RegistryService> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let ids = Arc::new(MonotonicIdGenerator::new(clock.clone()));
        Arc::new(RegistryService::new(db, clock, ids))
    }

    #[tokio::test(start_paused = true)]
    async fn test_pushes_once_per_interval() {
        let broadcaster = StatsBroadcaster::new(registry(), DEFAULT_STATS_INTERVAL);
        let mut sink = RecordingSink::accepting(3);

        let started = Instant::now();
        let end = broadcaster.stream(&mut sink).await;

        assert_eq!(end, StreamEnd::PushFailed);
        assert_eq!(sink.pushes.len(), 3);
        for (i, (at, _)) in sink.pushes.iter().enumerate() {
            let expected = DEFAULT_STATS_INTERVAL * (i as u32 + 1);
            let elapsed = at.duration_since(started);
            assert!(elapsed >= expected && elapsed < expected + Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_after_first_failed_push() {
        let broadcaster = StatsBroadcaster::new(registry(), Duration::from_secs(1));
        let mut sink = RecordingSink::accepting(0);

        let end = broadcaster.stream(&mut sink).await;

        assert_eq!(end, StreamEnd::PushFailed);
        assert_eq!(sink.attempts, 1);
        assert!(sink.pushes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_payload_is_plain_stats_json() {
        let registry = registry();
        registry
            .add_bot(NewBot {
                token: "t".into(),
                channel_id: "-1".into(),
                ..Default::default()
            })
            .unwrap();
        let broadcaster = StatsBroadcaster::new(registry, DEFAULT_STATS_INTERVAL);
        let mut sink = RecordingSink::accepting(1);

        broadcaster.stream(&mut sink).await;

        let value: serde_json::Value = serde_json::from_str(&sink.pushes[0].1).unwrap();
        assert_eq!(value["active_bots"], 1);
        assert_eq!(value["total_files"], 0);
        assert_eq!(value["active_links"], 0);
        assert!(value["cache_size_gb"].is_null());
        assert_eq!(value["cache_metrics"], "unknown");
    }
}
