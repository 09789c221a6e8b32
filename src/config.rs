use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::matcher::{
    DEFAULT_MATCH_LIMIT, DEFAULT_MATCH_MIN_SCORE, DEFAULT_PAIR_LIMIT, DEFAULT_PAIR_MIN_SCORE,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub firebase: FirebaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Where member records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firebase,
    #[default]
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,
    /// JSON export loaded by the memory backend
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_users_path")]
    pub users_path: String,
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FirebaseSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            users_path: default_users_path(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_users_path() -> String { "users".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

fn default_cache_ttl() -> u64 { 30 }
fn default_cache_entries() -> u64 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_match_limit")]
    pub default_match_limit: usize,
    #[serde(default = "default_match_min_score")]
    pub default_match_min_score: u32,
    #[serde(default = "default_pair_limit")]
    pub default_pair_limit: usize,
    #[serde(default = "default_pair_min_score")]
    pub default_pair_min_score: u32,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Members considered by the quadratic pairing pass
    #[serde(default = "default_max_pairing_pool")]
    pub max_pairing_pool: usize,
}

impl MatchingSettings {
    /// Requested limit, or the default, never above `max_limit`
    pub fn effective_limit(&self, requested: Option<u16>, default: usize) -> usize {
        requested
            .map(usize::from)
            .unwrap_or(default)
            .clamp(1, self.max_limit.max(1))
    }
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_match_limit: default_match_limit(),
            default_match_min_score: default_match_min_score(),
            default_pair_limit: default_pair_limit(),
            default_pair_min_score: default_pair_min_score(),
            max_limit: default_max_limit(),
            max_pairing_pool: default_max_pairing_pool(),
        }
    }
}

fn default_match_limit() -> usize { DEFAULT_MATCH_LIMIT }
fn default_match_min_score() -> u32 { DEFAULT_MATCH_MIN_SCORE }
fn default_pair_limit() -> usize { DEFAULT_PAIR_LIMIT }
fn default_pair_min_score() -> u32 { DEFAULT_PAIR_MIN_SCORE }
fn default_max_limit() -> usize { 100 }
fn default_max_pairing_pool() -> usize { 2000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GURU__)
    /// 5. FIREBASE_DATABASE_URL / FIREBASE_AUTH_TOKEN
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GURU__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("GURU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GURU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional Firebase variables on top of everything else
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("FIREBASE_DATABASE_URL") {
        builder = builder.set_override("firebase.database_url", url)?;
    }
    if let Ok(token) = env::var("FIREBASE_AUTH_TOKEN") {
        builder = builder.set_override("firebase.auth_token", token)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.default_match_limit, 10);
        assert_eq!(matching.default_match_min_score, 5);
        assert_eq!(matching.default_pair_limit, 20);
        assert_eq!(matching.default_pair_min_score, 10);
        assert_eq!(matching.max_limit, 100);
    }

    #[test]
    fn test_effective_limit() {
        let matching = MatchingSettings { max_limit: 50, ..Default::default() };
        assert_eq!(matching.effective_limit(None, 20), 20);
        assert_eq!(matching.effective_limit(Some(7), 20), 7);
        assert_eq!(matching.effective_limit(Some(80), 20), 50);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_config_boots_memory_store() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.firebase.users_path, "users");
    }

    #[test]
    fn test_shipped_default_config_parses() {
        let settings: Settings = toml::from_str(include_str!("../config/default.toml")).unwrap();
        assert_eq!(settings.cache.ttl_secs, 30);
        assert_eq!(settings.matching.max_pairing_pool, 2000);
    }
}
