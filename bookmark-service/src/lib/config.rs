use std::env;

use anyhow::Context;
use auth::Authenticator;
use auth::HashingCost;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::DEFAULT_TOKEN_TTL_MINUTES;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing settings.
///
/// A missing `secret` makes the server generate a random one at startup, so
/// tokens do not survive a restart.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: default_algorithm(),
            expiration_minutes: default_expiration_minutes(),
        }
    }
}

/// Argon2 cost parameters for password hashing.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    #[serde(default = "default_memory_cost_kib")]
    pub memory_cost_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: default_memory_cost_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expiration_minutes() -> i64 {
    DEFAULT_TOKEN_TTL_MINUTES
}

fn default_memory_cost_kib() -> u32 {
    HashingCost::default().memory_kib
}

fn default_iterations() -> u32 {
    HashingCost::default().iterations
}

fn default_parallelism() -> u32 {
    HashingCost::default().parallelism
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }

    /// Build the authenticator described by the `jwt` and `password` sections.
    ///
    /// # Errors
    /// Fails when the algorithm is not an HMAC-SHA2 variant, the token
    /// lifetime is not positive, or the Argon2 parameters are out of range.
    pub fn authenticator(&self) -> Result<Authenticator, anyhow::Error> {
        let secret = match &self.jwt.secret {
            Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
            _ => {
                tracing::warn!(
                    "No jwt.secret configured; using a random key, issued tokens will not survive a restart"
                );
                Authenticator::generate_secret()
            }
        };

        if self.jwt.expiration_minutes <= 0 {
            anyhow::bail!(
                "jwt.expiration_minutes must be positive, got {}",
                self.jwt.expiration_minutes
            );
        }

        let codec = TokenCodec::with_algorithm(&secret, &self.jwt.algorithm)
            .context("Invalid jwt.algorithm")?;

        let hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: self.password.memory_cost_kib,
            iterations: self.password.iterations,
            parallelism: self.password.parallelism,
        })
        .context("Invalid password hashing parameters")?;

        Ok(Authenticator::with_parts(
            hasher,
            codec,
            chrono::Duration::minutes(self.jwt.expiration_minutes),
        ))
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    const MINIMAL: &str = r#"
        [database]
        url = "postgres://localhost/bookmarks"

        [server]
        http_port = 8080
    "#;

    #[test]
    fn test_defaults_apply() {
        let config = parse(MINIMAL);

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.secret, None);
        assert_eq!(config.jwt.algorithm, "HS256");
        assert_eq!(config.jwt.expiration_minutes, 30);
        assert_eq!(
            config.password.memory_cost_kib,
            HashingCost::default().memory_kib
        );
    }

    #[test]
    fn test_authenticator_uses_configured_secret_and_ttl() {
        let config = parse(&format!(
            "{MINIMAL}\n[jwt]\nsecret = \"configured_secret_key_for_tests\"\nexpiration_minutes = 5\n\
             [password]\nmemory_cost_kib = 1024\niterations = 1\nparallelism = 1\n"
        ));

        let authenticator = config.authenticator().unwrap();
        assert_eq!(authenticator.token_ttl(), chrono::Duration::minutes(5));

        let token = authenticator.issue_token("alice").unwrap();
        let same_secret = Authenticator::new(b"configured_secret_key_for_tests");
        assert_eq!(same_secret.validate_token(&token).unwrap().subject, "alice");
    }

    #[test]
    fn test_authenticator_without_secret_still_works() {
        let config = parse(MINIMAL);

        let authenticator = config.authenticator().unwrap();
        let token = authenticator.issue_token("alice").unwrap();
        assert!(authenticator.validate_token(&token).is_ok());
    }

    #[test]
    fn test_authenticator_rejects_asymmetric_algorithm() {
        let config = parse(&format!("{MINIMAL}\n[jwt]\nalgorithm = \"RS256\"\n"));

        assert!(config.authenticator().is_err());
    }

    #[test]
    fn test_load_reads_environment_overrides() {
        env::set_var("DATABASE__URL", "postgres://env-host/bookmarks");
        env::set_var("JWT__SECRET", "secret_from_environment");
        env::set_var("SERVER__HTTP_PORT", "9999");

        let config = Config::load();

        env::remove_var("DATABASE__URL");
        env::remove_var("JWT__SECRET");
        env::remove_var("SERVER__HTTP_PORT");

        let config = config.unwrap();
        assert_eq!(config.database.url, "postgres://env-host/bookmarks");
        assert_eq!(config.jwt.secret.as_deref(), Some("secret_from_environment"));
        assert_eq!(config.server.http_port, 9999);
    }

    #[test]
    fn test_authenticator_rejects_non_positive_ttl() {
        let config = parse(&format!("{MINIMAL}\n[jwt]\nexpiration_minutes = 0\n"));

        assert!(config.authenticator().is_err());
    }
}
