//! Club API configuration module.
//!
//! Configuration is read once at startup:
//! 1. `.env` is loaded into the process environment (if present)
//! 2. the TOML file named by `CLUB_CONFIG` is parsed (if set)
//! 3. `CLUB_*` environment variables override individual values
//! 4. the result is validated
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [database]
//! path = "./data/club.db"
//! max_connections = 5
//!
//! [auth]
//! jwt_secret = "a-long-random-secret"
//! access_token_minutes = 480
//!
//! [rates]
//! default_class = "pool"
//!
//! [[rates.classes]]
//! name = "pool"
//! hourly_rate_cents = 14000
//! tables = [1, 2]
//! ```

use std::env;
use std::path::{Path, PathBuf};

use cue_core::RateTable;
use cue_db::DbConfig;
use serde::Deserialize;

const DEV_JWT_SECRET: &str = "cue-club-dev-secret-change-in-production";

/// Club API configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DbConfig,
    pub auth: AuthConfig,
    pub rates: RateTable,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,

    /// Access token lifetime (default: 8 hours)
    pub access_token_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            access_token_minutes: 480,
        }
    }
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl AppConfig {
    /// Load configuration from `CLUB_CONFIG` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal outside development.
        let _ = dotenvy::dotenv();

        let mut config = match env::var("CLUB_CONFIG") {
            Ok(path) => AppConfig::from_file(path)?,
            Err(_) => AppConfig::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        AppConfig::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `CLUB_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("CLUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CLUB_PORT") {
            self.server.port = parse_var("CLUB_PORT", &port)?;
        }
        if let Some(path) = lookup("CLUB_DATABASE_PATH") {
            self.database.database_path = PathBuf::from(path);
        }
        if let Some(max) = lookup("CLUB_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("CLUB_DB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(secret) = lookup("CLUB_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(minutes) = lookup("CLUB_ACCESS_TOKEN_MINUTES") {
            self.auth.access_token_minutes = parse_var("CLUB_ACCESS_TOKEN_MINUTES", &minutes)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("server.port".to_string()));
        }
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("auth.jwt_secret".to_string()));
        }
        if self.auth.access_token_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "auth.access_token_minutes".to_string(),
            ));
        }
        if self.database.max_connections == 0
            || self.database.min_connections > self.database.max_connections
        {
            return Err(ConfigError::InvalidValue(
                "database.max_connections".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.access_token_minutes, 480);
        assert!(config.auth.uses_dev_secret());
        assert_eq!(config.rates.rate_for(3).cents(), 18_000);
    }

    #[test]
    fn test_toml_sections() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9100

            [database]
            path = "/var/lib/club/club.db"
            busy_timeout = 10

            [rates]
            default_class = "pool"

            [[rates.classes]]
            name = "pool"
            hourly_rate_cents = 15000
            tables = [1, 2, 3]

            [[rates.classes]]
            name = "snooker"
            hourly_rate_cents = 25000
            tables = [4]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.database_path, PathBuf::from("/var/lib/club/club.db"));
        assert_eq!(config.database.busy_timeout.as_secs(), 10);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.rates.rate_for(4).cents(), 25_000);
        assert_eq!(config.rates.rate_for(9).cents(), 15_000);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = AppConfig::from_toml(include_str!("../../../config/club.toml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.rates, RateTable::default());
    }

    #[test]
    fn test_bad_rate_table_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [rates]
            default_class = "missing"

            [[rates.classes]]
            name = "pool"
            hourly_rate_cents = 14000
            tables = [1]
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CLUB_PORT", "8080"),
            ("CLUB_DATABASE_PATH", "/tmp/club.db"),
            ("CLUB_JWT_SECRET", "from-the-environment"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.database_path, PathBuf::from("/tmp/club.db"));
        assert!(!config.auth.uses_dev_secret());
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(|key| (key == "CLUB_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "CLUB_PORT"));
    }

    #[test]
    fn test_validate_rejects_nonsense() {
        let mut config = AppConfig::default();
        config.auth.access_token_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired(_))
        ));
    }
}
