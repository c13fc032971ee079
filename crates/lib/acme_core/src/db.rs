//! PostgreSQL connection setup.
//!
//! The pool talks to an externally managed database. TLS is required unless
//! explicitly turned off for a local instance.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use thiserror::Error;

/// Default maximum number of pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a pooled connection.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while configuring or opening the pool.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database configuration error: {0}")]
    Config(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;

/// Connection settings for the user database.
#[derive(Clone)]
pub struct DbConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long to wait for a free connection.
    pub acquire_timeout: Duration,
    /// Force `sslmode=require` regardless of the URL.
    pub require_ssl: bool,
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &redact_url(&self.url))
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("require_ssl", &self.require_ssl)
            .finish()
    }
}

impl DbConfig {
    /// Settings for `url` with the defaults (TLS required).
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            require_ssl: true,
        }
    }

    /// Reads configuration from environment variables.
    ///
    /// | Variable                  | Default                      |
    /// |---------------------------|------------------------------|
    /// | `POSTGRES_URL`            | `DATABASE_URL`, else error   |
    /// | `DB_MAX_CONNECTIONS`      | `5`                          |
    /// | `DB_REQUIRE_SSL`          | `true`                       |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("POSTGRES_URL")
            .filter(|v| !v.is_empty())
            .or_else(|| lookup("DATABASE_URL").filter(|v| !v.is_empty()))
            .ok_or_else(|| DbError::Config("POSTGRES_URL is not set".into()))?;

        let mut config = Self::new(url);
        if let Some(raw) = lookup("DB_MAX_CONNECTIONS") {
            config.max_connections = raw
                .parse()
                .map_err(|_| DbError::Config(format!("invalid DB_MAX_CONNECTIONS: {raw}")))?;
        }
        if let Some(raw) = lookup("DB_REQUIRE_SSL") {
            config.require_ssl = parse_bool(&raw)
                .ok_or_else(|| DbError::Config(format!("invalid DB_REQUIRE_SSL: {raw}")))?;
        }
        Ok(config)
    }
}

/// Parse the URL into connect options, forcing TLS when configured.
pub fn connect_options(config: &DbConfig) -> Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| DbError::Config(format!("invalid database URL: {e}")))?;
    if config.require_ssl {
        Ok(options.ssl_mode(PgSslMode::Require))
    } else {
        Ok(options)
    }
}

/// Open a connection pool to the user database.
pub async fn connect(config: &DbConfig) -> Result<PgPool> {
    let options = connect_options(config)?;
    log::info!(
        "Connecting to {} (max_connections={}, require_ssl={})",
        redact_url(&config.url),
        config.max_connections,
        config.require_ssl
    );
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;
    log::info!("Database pool ready");
    Ok(pool)
}

/// Strip the password from a connection URL for logging.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
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
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn postgres_url_wins_over_database_url() {
        let config = DbConfig::from_lookup(lookup(&[
            ("POSTGRES_URL", "postgres://a@db/acme"),
            ("DATABASE_URL", "postgres://b@db/other"),
        ]))
        .unwrap();
        assert_eq!(config.url, "postgres://a@db/acme");
        assert!(config.require_ssl);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn falls_back_to_database_url() {
        let config =
            DbConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://b@db/other")])).unwrap();
        assert_eq!(config.url, "postgres://b@db/other");
    }

    #[test]
    fn missing_url_is_a_config_error() {
        assert!(matches!(
            DbConfig::from_lookup(lookup(&[])),
            Err(DbError::Config(_))
        ));
    }

    #[test]
    fn parses_pool_settings() {
        let config = DbConfig::from_lookup(lookup(&[
            ("POSTGRES_URL", "postgres://a@db/acme"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("DB_REQUIRE_SSL", "off"),
        ]))
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert!(!config.require_ssl);

        assert!(
            DbConfig::from_lookup(lookup(&[
                ("POSTGRES_URL", "postgres://a@db/acme"),
                ("DB_REQUIRE_SSL", "maybe"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn ssl_is_forced_even_when_url_disables_it() {
        let config = DbConfig::new("postgres://acme@db.example.com/acme?sslmode=disable");
        let options = connect_options(&config).unwrap();
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Require));
        assert_eq!(options.get_host(), "db.example.com");
    }

    #[test]
    fn ssl_follows_url_when_not_required() {
        let mut config = DbConfig::new("postgres://acme@localhost/acme?sslmode=disable");
        config.require_ssl = false;
        let options = connect_options(&config).unwrap();
        assert!(matches!(options.get_ssl_mode(), PgSslMode::Disable));
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let config = DbConfig::new("not a url");
        assert!(matches!(connect_options(&config), Err(DbError::Config(_))));
    }

    #[test]
    fn redacts_password() {
        assert_eq!(
            redact_url("postgres://acme:s3cret@db:5432/acme"),
            "postgres://acme:***@db:5432/acme"
        );
        assert_eq!(redact_url("postgres://db/acme"), "postgres://db/acme");
        let debug = format!("{:?}", DbConfig::new("postgres://acme:s3cret@db/acme"));
        assert!(!debug.contains("s3cret"));
    }
}
