//! Server configuration from the environment.

use std::time::Duration;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

const DEFAULT_CONTEST_TTL_HOURS: u64 = 12;
const DEFAULT_CLEANUP_INTERVAL_MINUTES: u64 = 30;

/// Listen address and contest cleanup settings.
///
/// - `HOST` (default `0.0.0.0`), `PORT` (default `8080`)
/// - `CONTEST_TTL_HOURS`: contests idle this long are removed (default 12)
/// - `CLEANUP_INTERVAL_MINUTES`: how often to look for idle contests (default 30)
///
/// Missing or unparsable values fall back to the default.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub contest_ttl: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            contest_ttl: Duration::from_secs(DEFAULT_CONTEST_TTL_HOURS * 3600),
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_MINUTES * 60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        let hours = get("CONTEST_TTL_HOURS").and_then(|v| v.parse::<u64>().ok());
        let minutes = get("CLEANUP_INTERVAL_MINUTES")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&m| m > 0);
        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            contest_ttl: hours
                .map(|h| Duration::from_secs(h * 3600))
                .unwrap_or(defaults.contest_ttl),
            cleanup_interval: minutes
                .map(|m| Duration::from_secs(m * 60))
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}
