use crate::{ConfigError, FromEnv, env_or_default};
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

/// Listener settings shared by the HTTP apps.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_grace_secs: u64,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            shutdown_grace_secs: 30,
        }
    }

    /// "host:port", ready for a TcpListener bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Time in-flight requests and cleanup tasks get during shutdown.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

impl FromEnv for ServerConfig {
    /// Reads `HOST` (default 0.0.0.0, all interfaces), `PORT` (default 8080)
    /// and `SHUTDOWN_GRACE_SECS` (default 30).
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string()),
            port: parse_var("PORT", "8080")?,
            shutdown_grace_secs: parse_var("SHUTDOWN_GRACE_SECS", "30")?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_all_interfaces() {
        temp_env::with_vars(
            [
                ("HOST", None::<&str>),
                ("PORT", None::<&str>),
                ("SHUTDOWN_GRACE_SECS", None::<&str>),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "0.0.0.0:8080");
                assert_eq!(config.shutdown_grace(), Duration::from_secs(30));
            },
        );
    }

    #[test]
    fn environment_overrides_every_field() {
        temp_env::with_vars(
            [
                ("HOST", Some("127.0.0.1")),
                ("PORT", Some("3000")),
                ("SHUTDOWN_GRACE_SECS", Some("5")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.host, "127.0.0.1");
                assert_eq!(config.port, 3000);
                assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn partial_overrides_keep_the_other_defaults() {
        temp_env::with_vars(
            [
                ("HOST", None::<&str>),
                ("PORT", Some("9000")),
                ("SHUTDOWN_GRACE_SECS", None::<&str>),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.host, "0.0.0.0");
                assert_eq!(config.port, 9000);
            },
        );
    }

    #[test]
    fn unparseable_ports_are_rejected() {
        for bad in ["not_a_number", "99999"] {
            temp_env::with_var("PORT", Some(bad), || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PORT"));
            });
        }
    }

    #[test]
    fn negative_grace_period_is_rejected() {
        temp_env::with_vars(
            [("PORT", None::<&str>), ("SHUTDOWN_GRACE_SECS", Some("-1"))],
            || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SHUTDOWN_GRACE_SECS"));
            },
        );
    }

    #[test]
    fn address_joins_host_and_port() {
        let config = ServerConfig::new("localhost".to_string(), 8080);
        assert_eq!(config.address(), "localhost:8080");
        assert_eq!(config.shutdown_grace_secs, 30);
    }
}
