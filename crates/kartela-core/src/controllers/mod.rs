use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::RateLimiter;
use crate::config::Config;

/// Shared application state available in all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    /// Throttles badge scans per client address
    pub badge_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let badge_limiter = RateLimiter::new(
            config.access.rate_limit_max_attempts,
            config.access.rate_limit_window_secs,
        );
        AppState {
            db,
            config: Arc::new(config),
            badge_limiter: Arc::new(badge_limiter),
        }
    }
}

pub mod access;
pub mod admin;
pub mod customers;
pub mod dashboard;
pub mod locations;
pub mod swatches;
