use serde::Deserialize;

/// Default signing secret; refused when `ENVIRONMENT=production`.
pub const DEV_JWT_SECRET: &str = "kartela-dev-secret-change-me";

/// Shortest and longest lifetime of a room session, in hours.
pub const SESSION_TTL_MIN_HOURS: u64 = 8;
pub const SESSION_TTL_MAX_HOURS: u64 = 24;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL (e.g. sqlite://kartela.db, postgres://...)
    pub database_url: String,

    /// Secret used to sign badge tickets and room session tokens
    pub jwt_secret: String,

    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 3000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// Access-control settings (session lifetime, rate limiting, cookies)
    pub access: AccessConfig,
}

/// Settings for the badge → room access flow.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Room session lifetime in hours, always within 8..=24 (default: 8)
    pub session_ttl_hours: u64,

    /// Lifetime of the ticket issued after a badge scan (default: 300)
    pub badge_ticket_ttl_secs: u64,

    /// Throttle badge scans per client address
    pub enable_rate_limit: bool,

    /// Badge scans allowed per window (default: 10)
    pub rate_limit_max_attempts: u32,

    /// Rate limit window in seconds (default: 60)
    pub rate_limit_window_secs: u64,

    /// Mark the `room_session` cookie `Secure`
    pub secure_cookies: bool,

    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Only enable behind a reverse proxy that overwrites these headers.
    pub trust_proxy_headers: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            session_ttl_hours: SESSION_TTL_MIN_HOURS,
            badge_ticket_ttl_secs: 300,
            enable_rate_limit: true,
            rate_limit_max_attempts: 10,
            rate_limit_window_secs: 60,
            secure_cookies: false,
            trust_proxy_headers: false,
        }
    }
}

impl AccessConfig {
    /// Clamp a requested session lifetime into the supported range.
    pub fn clamp_session_ttl(hours: u64) -> u64 {
        hours.clamp(SESSION_TTL_MIN_HOURS, SESSION_TTL_MAX_HOURS)
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        let defaults = AccessConfig::default();
        let config = Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://kartela.db?mode=rwc".to_string()),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env_parse("SERVER_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            access: AccessConfig {
                session_ttl_hours: AccessConfig::clamp_session_ttl(env_parse(
                    "SESSION_TTL_HOURS",
                    defaults.session_ttl_hours,
                )),
                badge_ticket_ttl_secs: env_parse(
                    "BADGE_TICKET_TTL_SECS",
                    defaults.badge_ticket_ttl_secs,
                ),
                enable_rate_limit: env_flag("ENABLE_RATE_LIMIT", defaults.enable_rate_limit),
                rate_limit_max_attempts: env_parse(
                    "RATE_LIMIT_MAX_ATTEMPTS",
                    defaults.rate_limit_max_attempts,
                ),
                rate_limit_window_secs: env_parse(
                    "RATE_LIMIT_WINDOW_SECS",
                    defaults.rate_limit_window_secs,
                ),
                secure_cookies: env_flag("SECURE_COOKIES", false),
                trust_proxy_headers: env_flag("TRUST_PROXY_HEADERS", false),
            },
        };

        config.check()?;
        Ok(config)
    }

    /// Reject settings that must never reach production.
    pub fn check(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            return Err("JWT_SECRET must be set in production".into());
        }
        if self.jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".into());
        }
        Ok(())
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
