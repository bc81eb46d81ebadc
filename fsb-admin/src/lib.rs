//! Admin dashboard service for the file stream bot.
//!
//! Tracks registered bots and the files they processed in a local SQLite
//! store, serves them over a JSON API and pushes live stats to dashboard
//! observers over a WebSocket.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod cache_metrics;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod registry;

use cache_metrics::DirectoryCacheMetrics;
use clock::{Clock, MonotonicIdGenerator, SystemClock};
use config::Config;
use db::Database;
use error::AdminError;
use gateway::StatsBroadcaster;
use middleware::AccessPolicy;
use registry::RegistryService;

pub struct AppState {
    pub registry: Arc<RegistryService>,
    pub broadcaster: Arc<StatsBroadcaster>,
    pub access: AccessPolicy,
    pub static_dir: PathBuf,
    pub started_at: DateTime<Utc>,
}

/// Open the store and wire up the registry, broadcaster and access policy.
///
/// Schema initialization failure is returned as [`AdminError::Startup`].
pub fn build_state(config: &Config) -> Result<AppState, AdminError> {
    log::info!("Initializing database at {}", config.database_url);
    let db = Arc::new(Database::new(&config.database_url)?);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids = Arc::new(MonotonicIdGenerator::new(clock.clone()));
    let mut registry = RegistryService::new(db, clock.clone(), ids);

    match &config.cache_dir {
        Some(dir) => {
            log::info!("Measuring cache usage from {}", dir.display());
            registry = registry.with_cache_metrics(Arc::new(DirectoryCacheMetrics::new(dir)));
        }
        None => log::info!("ADMIN_CACHE_DIR not set, cache metrics will be reported as unknown"),
    }
    let registry = Arc::new(registry);

    let broadcaster = Arc::new(StatsBroadcaster::new(registry.clone(), config.stats_interval));

    let access = AccessPolicy::from_token(config.admin_token.clone());
    if access.is_open() {
        log::warn!("ADMIN_TOKEN not set - admin API is unauthenticated");
    }

    Ok(AppState {
        registry,
        broadcaster,
        access,
        static_dir: config.static_dir.clone(),
        started_at: clock.now(),
    })
}

/// Register every admin route
pub fn configure(cfg: &mut web::ServiceConfig, static_dir: &Path) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AdminError::InvalidInput(err.to_string()).into()
    }))
    .configure(controllers::health::config)
    .configure(controllers::dashboard::config)
    .configure(controllers::stats::config)
    .configure(controllers::bots::config)
    .configure(controllers::files::config)
    .configure(controllers::settings::config)
    .route("/api/ws", web::get().to(gateway::actix_ws::ws_handler))
    .service(Files::new("/static", static_dir));
}

/// Startup routine: initialize the store, then serve until shutdown
pub async fn run(config: Config) -> std::io::Result<()> {
    let state = build_state(&config).map_err(|e| {
        log::error!("{}", e);
        std::io::Error::other(e.to_string())
    })?;
    let state = web::Data::new(state);
    let static_dir = config.static_dir.clone();

    log::info!("Starting admin panel on {}:{}", config.host, config.port);
    log::info!("Serving dashboard assets from {}", static_dir.display());
    log::info!(
        "Live stats WebSocket available at /api/ws (every {}s)",
        state.broadcaster.interval().as_secs()
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
        let static_dir = static_dir.clone();

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(move |cfg| configure(cfg, &static_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("admin.db");
        let db_path = db_path.to_str().unwrap().to_string();
        let config = Config::from_lookup(|key| match key {
            "ADMIN_DATABASE_URL" => Some(db_path.clone()),
            "ADMIN_TOKEN" => Some("secret".to_string()),
            "ADMIN_CACHE_DIR" => Some(dir.path().to_str().unwrap().to_string()),
            _ => None,
        });

        let state = build_state(&config).unwrap();
        assert!(!state.access.is_open());
        assert_eq!(state.broadcaster.interval(), gateway::DEFAULT_STATS_INTERVAL);

        let stats = state.registry.get_stats().unwrap();
        assert_eq!(stats.active_bots, 0);
        assert_eq!(stats.cache_metrics, models::CacheMetricsStatus::Measured);
    }
}
