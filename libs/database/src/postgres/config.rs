use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

/// PostgreSQL connection pool settings.
///
/// Everything except the URL has a default tuned for a small service, so the
/// usual path is `PostgresConfig::from_env()` with only `DATABASE_URL` set.
/// The struct converts into SeaORM [`ConnectOptions`] when connecting.
///
/// # Example
///
/// ```ignore
/// use core_config::FromEnv;
/// use database::postgres::{PostgresConfig, connect_from_config_with_retry};
///
/// let config = PostgresConfig::from_env()?;
/// let db = connect_from_config_with_retry(config, None).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    /// Connection URL, the one setting with no default
    pub url: String,

    /// Pool ceiling
    pub max_connections: u32,

    /// Connections kept open even when idle
    pub min_connections: u32,

    /// Seconds to wait while establishing a connection
    pub connect_timeout_secs: u64,

    /// Seconds to wait for a free connection from the pool
    pub acquire_timeout_secs: u64,

    /// Seconds an idle connection survives before being dropped
    pub idle_timeout_secs: u64,

    /// Seconds a connection lives before being recycled
    pub max_lifetime_secs: u64,

    /// Whether to log executed SQL
    pub sqlx_logging: bool,

    /// Level the SQL statements are logged at
    pub sqlx_logging_level: LevelFilter,
}

impl PostgresConfig {
    /// Pool settings for `url` with every knob at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 100,
            min_connections: 5,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 8,
            max_lifetime_secs: 8,
            sqlx_logging: true,
            sqlx_logging_level: LevelFilter::Info,
        }
    }

    /// Convert into SeaORM [`ConnectOptions`].
    ///
    /// SeaORM wants the timeout knobs as [`Duration`]s; the config keeps them
    /// as plain seconds because that is what the environment provides.
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut options = ConnectOptions::new(&self.url);
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
        options
    }

    /// The connection URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl FromEnv for PostgresConfig {
    /// Load the pool settings from the environment.
    ///
    /// `DATABASE_URL` is required; the rest fall back to the defaults of
    /// [`PostgresConfig::new`]:
    /// - `DB_MAX_CONNECTIONS` (100)
    /// - `DB_MIN_CONNECTIONS` (5)
    /// - `DB_CONNECT_TIMEOUT_SECS` (8)
    /// - `DB_ACQUIRE_TIMEOUT_SECS` (8)
    /// - `DB_IDLE_TIMEOUT_SECS` (8)
    /// - `DB_MAX_LIFETIME_SECS` (8)
    /// - `DB_SQLX_LOGGING` (true)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("DATABASE_URL")?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", "100")?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", "5")?,
            connect_timeout_secs: parse_var("DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout_secs: parse_var("DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", "8")?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", "8")?,
            sqlx_logging: parse_var("DB_SQLX_LOGGING", "true")?,
            sqlx_logging_level: LevelFilter::Info,
        })
    }
}

/// Read an env var with a default and parse it, naming the variable in the
/// error so misconfigured deployments fail with a usable message.
fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}
