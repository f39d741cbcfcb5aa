use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 6333;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set (add it to the environment or .env)")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Connection settings for the remote Qdrant service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl QdrantConfig {
    /// Get the base URL of the Qdrant HTTP API
    ///
    /// The host may carry a scheme but no path, query, or fragment. The
    /// configured port always wins over one embedded in the host.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.host)
        };

        let mut url =
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(format!("{raw}: {e}")))?;
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidUrl(format!(
                "{raw}: host must not carry a path, query, or fragment"
            )));
        }
        url.set_port(Some(self.port))
            .map_err(|_| ConfigError::InvalidUrl(format!("{raw}: cannot set port {}", self.port)))?;
        Ok(url)
    }

    /// Basic auth credentials, only when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }
}

/// Timing knobs for the administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Pause between consecutive deletes of a batch
    pub delete_pacing: Duration,
    /// Pause before re-fetching a freshly created collection
    pub verify_delay: Duration,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(30),
            delete_pacing: Duration::from_millis(500),
            verify_delay: Duration::from_secs(1),
        }
    }
}

impl AdminSettings {
    /// Settings with no pauses, for scripted sessions.
    pub fn immediate() -> Self {
        Self {
            delete_pacing: Duration::ZERO,
            verify_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Values passed on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub qdrant: QdrantConfig,
    pub admin: AdminSettings,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&Overrides::default())
    }

    /// Load configuration from environment variables, applying `overrides` on top
    pub fn from_env_with(overrides: &Overrides) -> Result<Self, ConfigError> {
        let host = overrides
            .host
            .clone()
            .or_else(|| non_empty_var("QDRANT_HOST"))
            .ok_or(ConfigError::MissingVar("QDRANT_HOST"))?;

        let port = match overrides.port {
            Some(port) => port,
            None => match non_empty_var("QDRANT_PORT") {
                Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "QDRANT_PORT",
                    value,
                })?,
                None => DEFAULT_PORT,
            },
        };

        let qdrant = QdrantConfig {
            host,
            port,
            username: overrides
                .username
                .clone()
                .or_else(|| non_empty_var("QDRANT_USER")),
            password: non_empty_var("QDRANT_PASSWORD"),
        };

        // Catch a malformed host now rather than on the first request
        qdrant.base_url()?;

        Ok(Self {
            qdrant,
            admin: AdminSettings::default(),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopeguard::guard;
    use std::env;

    fn clean_env() {
        env::remove_var("QDRANT_HOST");
        env::remove_var("QDRANT_PORT");
        env::remove_var("QDRANT_USER");
        env::remove_var("QDRANT_PASSWORD");
        env::remove_var("LOG_LEVEL");
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_host_is_an_error() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("QDRANT_HOST")));
    }

    #[test]
    #[serial_test::serial]
    fn test_default_config() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("QDRANT_HOST", "vectors.internal");

        let config = Config::from_env().unwrap();

        assert_eq!(config.qdrant.port, 6333, "wrong default port");
        assert!(config.qdrant.credentials().is_none(), "credentials should be absent");
        assert_eq!(config.log_level, "warn", "wrong default log level");
        assert_eq!(
            config.qdrant.base_url().unwrap().as_str(),
            "http://vectors.internal:6333/"
        );
        assert_eq!(config.admin.read_timeout, Duration::from_secs(10));
        assert_eq!(config.admin.write_timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial_test::serial]
    fn test_custom_config() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("QDRANT_HOST", "https://qdrant.example.com");
        env::set_var("QDRANT_PORT", "443");
        env::set_var("QDRANT_USER", "admin");
        env::set_var("QDRANT_PASSWORD", "s3cret");
        env::set_var("LOG_LEVEL", "debug");

        let config = Config::from_env().unwrap();

        assert_eq!(config.qdrant.port, 443, "port mismatch");
        assert_eq!(config.qdrant.credentials(), Some(("admin", "s3cret")));
        assert_eq!(config.log_level, "debug", "log level mismatch");
        assert_eq!(
            config.qdrant.base_url().unwrap().as_str(),
            "https://qdrant.example.com/"
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_port_is_rejected() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("QDRANT_HOST", "localhost");
        env::set_var("QDRANT_PORT", "sixty");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { name: "QDRANT_PORT", .. }
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_overrides_win_over_environment() {
        clean_env();
        let _guard = guard((), |_| clean_env());

        env::set_var("QDRANT_HOST", "env-host");
        env::set_var("QDRANT_PORT", "7000");
        env::set_var("QDRANT_USER", "env-user");

        let overrides = Overrides {
            host: Some("cli-host".to_string()),
            port: Some(7100),
            username: Some("cli-user".to_string()),
        };
        let config = Config::from_env_with(&overrides).unwrap();

        assert_eq!(config.qdrant.host, "cli-host");
        assert_eq!(config.qdrant.port, 7100);
        assert_eq!(config.qdrant.username.as_deref(), Some("cli-user"));
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config = QdrantConfig {
            host: "localhost".to_string(),
            port: 6333,
            username: Some("admin".to_string()),
            password: None,
        };
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_url_generation() {
        let mut config = QdrantConfig {
            host: "localhost".to_string(),
            port: 6333,
            username: None,
            password: None,
        };
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:6333/");

        config.host = "http://example.com/".to_string();
        assert_eq!(config.base_url().unwrap().as_str(), "http://example.com:6333/");

        config.host = "not a host".to_string();
        assert!(config.base_url().is_err());

        config.host = "http://qdrant.internal:7000".to_string();
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://qdrant.internal:6333/"
        );

        config.host = "https://qdrant.example.com".to_string();
        config.port = 443;
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://qdrant.example.com/"
        );
    }

    #[test]
    fn test_url_rejects_host_with_path() {
        let mut config = QdrantConfig {
            host: "http://qdrant.internal/qdrant".to_string(),
            port: 6333,
            username: None,
            password: None,
        };
        let err = config.base_url().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(ref msg) if msg.contains("must not carry a path")));

        config.host = "qdrant.internal/api/".to_string();
        assert!(config.base_url().is_err());

        config.host = "qdrant.internal?x=1".to_string();
        assert!(config.base_url().is_err());
    }
}
