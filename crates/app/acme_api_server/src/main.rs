//! Acme sign-in API server binary.

use std::sync::Arc;
use std::time::Duration;

use acme_core::auth::PgUserStore;
use acme_core::db::{self, DbConfig};
use clap::Parser;
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "acme_api_server", about = "Acme sign-in API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, default_value_t = 3100)]
    port: u16,

    /// PostgreSQL connection URL. Falls back to `POSTGRES_URL`, then
    /// `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool
    /// (default `DB_MAX_CONNECTIONS`, else 5).
    #[arg(long)]
    max_connections: Option<u32>,

    /// Seconds to wait for a pooled connection before failing a lookup.
    #[arg(long)]
    acquire_timeout: Option<u64>,

    /// Do not force TLS on the database connection (local development only).
    /// `DB_REQUIRE_SSL=false` does the same.
    #[arg(long, default_value_t = false)]
    no_ssl: bool,
}

/// Database settings from the environment, with CLI flags taking precedence.
fn db_config(args: &Args, lookup: impl Fn(&str) -> Option<String>) -> db::Result<DbConfig> {
    let mut config = DbConfig::from_lookup(|key| match (key, &args.database_url) {
        ("POSTGRES_URL", Some(url)) => Some(url.clone()),
        _ => lookup(key),
    })?;
    if let Some(max_connections) = args.max_connections {
        config.max_connections = max_connections;
    }
    if let Some(secs) = args.acquire_timeout {
        config.acquire_timeout = Duration::from_secs(secs);
    }
    if args.no_ssl {
        config.require_ssl = false;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,acme_api=debug,acme_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let db_config = db_config(&args, |key| std::env::var(key).ok())?;
    info!(
        database_url = %db::redact_url(&db_config.url),
        port = args.port,
        require_ssl = db_config.require_ssl,
        "starting acme_api_server"
    );

    let pool = db::connect(&db_config).await?;

    let config = acme_api::config::ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        ..acme_api::config::ApiConfig::from_env()
    };

    let state = acme_api::AppState::new(Arc::new(PgUserStore::new(pool.clone())), config.clone());
    let app = acme_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutting down");
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("acme_api_server").chain(flags.iter().copied()))
            .unwrap()
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn database_url_falls_back_to_environment() {
        let config = db_config(&args(&[]), env(&[("DATABASE_URL", "postgres://db/acme")])).unwrap();
        assert_eq!(config.url, "postgres://db/acme");
        assert!(config.require_ssl);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn environment_settings_are_respected() {
        let config = db_config(
            &args(&[]),
            env(&[
                ("POSTGRES_URL", "postgres://primary/acme"),
                ("DATABASE_URL", "postgres://fallback/acme"),
                ("DB_REQUIRE_SSL", "false"),
                ("DB_MAX_CONNECTIONS", "12"),
            ]),
        )
        .unwrap();
        assert_eq!(config.url, "postgres://primary/acme");
        assert!(!config.require_ssl);
        assert_eq!(config.max_connections, 12);
    }

    #[test]
    fn flags_override_environment() {
        let config = db_config(
            &args(&[
                "--database-url",
                "postgres://cli/acme",
                "--max-connections",
                "2",
                "--acquire-timeout",
                "3",
                "--no-ssl",
            ]),
            env(&[
                ("POSTGRES_URL", "postgres://env/acme"),
                ("DB_MAX_CONNECTIONS", "12"),
                ("DB_REQUIRE_SSL", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(config.url, "postgres://cli/acme");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
        assert!(!config.require_ssl);
    }

    #[test]
    fn flag_url_is_enough_without_environment() {
        let config = db_config(&args(&["--database-url", "postgres://cli/acme"]), env(&[])).unwrap();
        assert_eq!(config.url, "postgres://cli/acme");
        assert!(config.require_ssl);
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = db_config(&args(&[]), env(&[])).unwrap_err();
        assert!(matches!(err, db::DbError::Config(_)));
    }
}
