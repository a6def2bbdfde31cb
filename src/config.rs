use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

use crate::infrastructure::storage::StoreBackend;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub user_store: StoreBackend,
    pub session_ttl_minutes: u32,
    pub session_prune_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            user_store: StoreBackend::Session,
            session_ttl_minutes: 120,
            session_prune_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            user_store: parse_var("USER_STORE").unwrap_or(defaults.user_store),
            session_ttl_minutes: parse_var("SESSION_TTL_MINUTES").unwrap_or(defaults.session_ttl_minutes),
            session_prune_secs: parse_var("SESSION_PRUNE_SECS").unwrap_or(defaults.session_prune_secs),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS").unwrap_or(defaults.request_timeout_secs),
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_ttl_minutes))
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

// Global static accessible everywhere
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
