pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use crate::http::pagination::PageConfig;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub paseto_access_key: [u8; 32],
    pub paseto_refresh_key: [u8; 32],
    pub access_ttl_minutes: u64,
    pub refresh_ttl_days: u64,
    pub pagination: PageConfig,
}

impl AppState {
    pub fn new(db: Db, config: &config::AppConfig) -> Self {
        Self {
            db,
            paseto_access_key: config.paseto_access_key,
            paseto_refresh_key: config.paseto_refresh_key,
            access_ttl_minutes: config.access_ttl_minutes,
            refresh_ttl_days: config.refresh_ttl_days,
            pagination: PageConfig {
                default_size: config.default_page_size,
                max_size: config.max_page_size,
            },
        }
    }
}
