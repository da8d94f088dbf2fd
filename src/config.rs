//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::CacheSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Expiring store sweep interval in seconds
    pub sweep_interval: u64,
    /// Scheduled refresh interval of the recent events view in seconds
    pub refresh_interval: u64,
    /// TTL of a cached single event in seconds
    pub entity_ttl: u64,
    /// TTL of the cached recent events view in seconds
    pub recent_ttl: u64,
    /// Serve the recent events view fresh on every request
    pub force_cache_refresh: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `CACHE_REFRESH_INTERVAL` - Recent events refresh in seconds (default: 120)
    /// - `CACHE_ENTITY_TTL` - Single event TTL in seconds (default: 300)
    /// - `CACHE_RECENT_TTL` - Recent events TTL in seconds (default: 300)
    /// - `FORCE_CACHE_REFRESH` or `DEBUG` - any non-empty value enables forced refresh
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            sweep_interval: parse_env("CACHE_SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            refresh_interval: parse_env("CACHE_REFRESH_INTERVAL")
                .unwrap_or(defaults.refresh_interval),
            entity_ttl: parse_env("CACHE_ENTITY_TTL").unwrap_or(defaults.entity_ttl),
            recent_ttl: parse_env("CACHE_RECENT_TTL").unwrap_or(defaults.recent_ttl),
            force_cache_refresh: flag_env("FORCE_CACHE_REFRESH") || flag_env("DEBUG"),
        }
    }

    /// Cache coordinator settings derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            entity_ttl: Duration::from_secs(self.entity_ttl),
            recent_ttl: Duration::from_secs(self.recent_ttl),
            refresh_interval: Duration::from_secs(self.refresh_interval),
            sweep_interval: Duration::from_secs(self.sweep_interval),
            force_refresh: self.force_cache_refresh,
            ..CacheSettings::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            sweep_interval: 300,
            refresh_interval: 120,
            entity_ttl: 300,
            recent_ttl: 300,
            force_cache_refresh: false,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn flag_env(key: &str) -> bool {
    env::var(key).map(|v| !v.is_empty()).unwrap_or(false)
}
