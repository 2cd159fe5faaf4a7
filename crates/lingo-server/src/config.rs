//! Server configuration
//!
//! Sources, lowest priority first: built-in defaults, an optional config
//! file (`lingo.toml` or the path in `LINGO_CONFIG`), then `LINGO_*`
//! environment variables such as `LINGO_BIND_ADDRESS`.

use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use tracing::warn;

const INSECURE_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    /// SQLite file, or `:memory:`
    pub database_path: String,
    pub jwt_secret: Option<String>,
    pub token_ttl_days: i64,
    pub export_cache_ttl_secs: i64,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("LINGO_CONFIG").unwrap_or_else(|_| "lingo".to_string());

        Self::from_sources(
            File::with_name(&file).required(false),
            Environment::with_prefix("LINGO"),
        )
    }

    /// Layer `file` and then `env` over the built-in defaults.
    fn from_sources<F>(file: F, env: Environment) -> Result<Self, ConfigError>
    where
        F: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:9000")?
            .set_default("database_path", "data/lingo.db")?
            .set_default("token_ttl_days", 30_i64)?
            .set_default(
                "export_cache_ttl_secs",
                lingo_core::DEFAULT_EXPORT_TTL_SECS,
            )?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn jwt_secret(&self) -> String {
        match &self.jwt_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                warn!("LINGO_JWT_SECRET not set, using default (insecure for production)");
                INSECURE_JWT_SECRET.to_string()
            }
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days.max(1))
    }

    pub fn export_cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.export_cache_ttl_secs.max(0))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9000".to_string(),
            database_path: "data/lingo.db".to_string(),
            jwt_secret: None,
            token_ttl_days: 30,
            export_cache_ttl_secs: lingo_core::DEFAULT_EXPORT_TTL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn no_file() -> impl Source + Send + Sync + 'static {
        File::from_str("", FileFormat::Toml)
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("LINGO").source(Some(vars))
    }

    #[test]
    fn test_loaded_defaults_match_default_impl() {
        let config = ServerConfig::from_sources(no_file(), env(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = ServerConfig::from_sources(
            no_file(),
            env(&[
                ("LINGO_EXPORT_CACHE_TTL_SECS", "5"),
                ("LINGO_BIND_ADDRESS", "127.0.0.1:8080"),
                ("OTHER_BIND_ADDRESS", "ignored"),
            ]),
        )
        .unwrap();

        assert_eq!(config.export_cache_ttl(), chrono::Duration::seconds(5));
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.database_path, "data/lingo.db");
    }

    #[test]
    fn test_env_wins_over_file() {
        let file = File::from_str(
            r#"
            bind_address = "127.0.0.1:7000"
            database_path = ":memory:"
            export_cache_ttl_secs = 10
            "#,
            FileFormat::Toml,
        );
        let config =
            ServerConfig::from_sources(file, env(&[("LINGO_BIND_ADDRESS", "127.0.0.1:8080")]))
                .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.database_path, ":memory:");
        assert_eq!(config.export_cache_ttl_secs, 10);
        assert_eq!(config.token_ttl_days, 30);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.export_cache_ttl(), chrono::Duration::seconds(60));
        assert_eq!(config.token_ttl(), chrono::Duration::days(30));
        assert_eq!(config.jwt_secret(), INSECURE_JWT_SECRET);
    }

    #[test]
    fn test_explicit_secret_wins() {
        let config = ServerConfig {
            jwt_secret: Some("s3cret".into()),
            ..Default::default()
        };
        assert_eq!(config.jwt_secret(), "s3cret");
    }
}
