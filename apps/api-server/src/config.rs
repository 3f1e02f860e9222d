//! Server configuration.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Which [`FilmStore`](film_store::FilmStore) backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process-local maps; data is lost on restart.
    #[default]
    Memory,
    /// SQLite database at `DATABASE_URL`.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => anyhow::bail!("Unknown storage backend: {other}"),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Storage backend.
    pub storage: StorageBackend,
    /// Database URL, used by the SQLite backend.
    pub database_url: String,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage: StorageBackend::Memory,
            database_url: "sqlite:reelmate.db?mode=rwc".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let storage = match lookup("REELMATE_STORAGE") {
            Some(value) => value.parse()?,
            None => defaults.storage,
        };

        Ok(Self {
            host: lookup("REELMATE_SERVER_HOST").unwrap_or(defaults.host),
            port: lookup("REELMATE_SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            storage,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            log_level: lookup("REELMATE_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("REELMATE_SERVER_HOST", "127.0.0.1"),
            ("REELMATE_SERVER_PORT", "9000"),
            ("REELMATE_STORAGE", "SQLite"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr(), "127.0.0.1:9000");
        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = Config::from_lookup(lookup(&[("REELMATE_SERVER_PORT", "eighty")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_unknown_storage_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("REELMATE_STORAGE", "postgres")])).is_err());
    }
}
