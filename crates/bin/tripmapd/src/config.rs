//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `tripmap.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;

use tripmap_adapter_storage_mysql_sqlx::Config as StorageConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Upload storage settings.
    pub storage: FilesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `MySQL` connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the discrete fields when set.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database (schema) name.
    pub schema: String,
    pub max_connections: u32,
    /// Create missing tables at startup.
    pub bootstrap_schema: bool,
}

/// Where uploaded files are kept.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Directory holding `uploads/`.
    pub base_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `tripmap.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("tripmap.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides from `lookup`, later keys winning over earlier ones.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("MYSQL_HOST") {
            self.database.host = val;
        }
        if let Some(port) = lookup("MYSQL_PORT").and_then(|val| val.parse().ok()) {
            self.database.port = port;
        }
        if let Some(val) = lookup("MYSQL_USER") {
            self.database.user = val;
        }
        if let Some(val) = lookup("MYSQL_PASS") {
            self.database.password = val;
        }
        if let Some(val) = lookup("MYSQL_SCHEMA") {
            self.database.schema = val;
        }
        if let Some(val) = lookup("TRIPMAP_DATABASE_URL") {
            self.database.url = Some(val);
        }
        if let Some(val) = lookup("TRIPMAP_HOST") {
            self.server.host = val;
        }
        for key in ["PORT", "TRIPMAP_PORT"] {
            if let Some(port) = lookup(key).and_then(|val| val.parse().ok()) {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("TRIPMAP_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = lookup("TRIPMAP_STORAGE_DIR") {
            self.storage.base_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("TRIPMAP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.url.is_none() && self.database.schema.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database schema must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings for the `MySQL` storage adapter.
    #[must_use]
    pub fn storage_config(&self) -> StorageConfig {
        let db = &self.database;
        StorageConfig {
            url: db.url.clone(),
            host: db.host.clone(),
            port: db.port,
            user: db.user.clone(),
            password: db.password.clone(),
            schema: db.schema.clone(),
            max_connections: db.max_connections,
            bootstrap_schema: db.bootstrap_schema,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let defaults = StorageConfig::default();
        Self {
            url: defaults.url,
            host: defaults.host,
            port: defaults.port,
            user: defaults.user,
            password: defaults.password,
            schema: defaults.schema,
            max_connections: defaults.max_connections,
            bootstrap_schema: defaults.bootstrap_schema,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "tripmapd=info,tripmap=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overridden(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).cloned());
        config
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.schema, "tripmap");
        assert!(config.database.url.is_none());
        assert!(!config.database.bootstrap_schema);
        assert_eq!(config.storage.base_dir, PathBuf::from("."));
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            host = 'db'
            port = 3307
            user = 'trips'
            password = 'hunter2'
            schema = 'itineraries'
            max_connections = 4
            bootstrap_schema = true

            [storage]
            base_dir = '/var/lib/tripmap'

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user, "trips");
        assert_eq!(config.database.password, "hunter2");
        assert_eq!(config.database.schema, "itineraries");
        assert_eq!(config.database.max_connections, 4);
        assert!(config.database.bootstrap_schema);
        assert_eq!(config.storage.base_dir, PathBuf::from("/var/lib/tripmap"));
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_read_config_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tripmap.toml");
        std::fs::write(&path, "[server]\nport = 4100\n").unwrap();

        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 4100);
    }

    #[test]
    fn should_apply_mysql_variables() {
        let config = overridden(&[
            ("MYSQL_HOST", "mysql.internal"),
            ("MYSQL_PORT", "3310"),
            ("MYSQL_USER", "app"),
            ("MYSQL_PASS", "secret"),
            ("MYSQL_SCHEMA", "trips"),
        ]);
        assert_eq!(config.database.host, "mysql.internal");
        assert_eq!(config.database.port, 3310);
        assert_eq!(config.database.user, "app");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.schema, "trips");
    }

    #[test]
    fn should_ignore_unparsable_port_variables() {
        let config = overridden(&[("MYSQL_PORT", "abc"), ("PORT", "http")]);
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_let_later_port_variables_win() {
        assert_eq!(overridden(&[("PORT", "8080")]).server.port, 8080);
        assert_eq!(
            overridden(&[("PORT", "8080"), ("TRIPMAP_PORT", "8081")]).server.port,
            8081
        );

        let config = overridden(&[("TRIPMAP_PORT", "8081"), ("TRIPMAP_BIND", "127.0.0.1:9000")]);
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn should_prefer_rust_log_over_tripmap_log() {
        let config = overridden(&[("TRIPMAP_LOG", "warn"), ("RUST_LOG", "trace")]);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_carry_database_url_and_storage_dir() {
        let config = overridden(&[
            ("TRIPMAP_DATABASE_URL", "mysql://u:p@h/db"),
            ("TRIPMAP_STORAGE_DIR", "/data"),
        ]);
        assert_eq!(config.storage_config().url.as_deref(), Some("mysql://u:p@h/db"));
        assert_eq!(config.storage.base_dir, PathBuf::from("/data"));
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_schema_without_url() {
        let mut config = Config::default();
        config.database.schema = " ".to_string();
        assert!(config.validate().is_err());

        config.database.url = Some("mysql://root@localhost/trips".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        assert_eq!(Config::default().bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_map_database_section_onto_storage_config() {
        let mut config = Config::default();
        config.database.schema = "trips".to_string();
        config.database.bootstrap_schema = true;

        let storage = config.storage_config();
        assert_eq!(storage.schema, "trips");
        assert!(storage.bootstrap_schema);
        assert!(storage.url.is_none());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
