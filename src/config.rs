//! Server settings read from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (8080), LEAGUE_TTL_HOURS (12),
//! CLEANUP_INTERVAL_MINUTES (30). Invalid or zero values fall back to the default.

use log::warn;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Leagues not accessed for this long are dropped.
    pub league_ttl: Duration,
    /// How often the eviction sweep runs.
    pub cleanup_interval: Duration,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TTL_HOURS: u64 = 12;
const DEFAULT_CLEANUP_MINUTES: u64 = 30;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            league_ttl: Duration::from_secs(DEFAULT_TTL_HOURS * 3600),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_MINUTES * 60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
        let ttl_hours = positive_or(&lookup, "LEAGUE_TTL_HOURS", DEFAULT_TTL_HOURS);
        let cleanup_minutes = positive_or(&lookup, "CLEANUP_INTERVAL_MINUTES", DEFAULT_CLEANUP_MINUTES);
        Self {
            host,
            port,
            league_ttl: Duration::from_secs(ttl_hours * 3600),
            cleanup_interval: Duration::from_secs(cleanup_minutes * 60),
        }
    }
}

fn parse_or<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
    }
}

fn positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match parse_or(lookup, key, default) {
        0 => {
            warn!("{} must be positive, using {}", key, default);
            default
        }
        v => v,
    }
}
