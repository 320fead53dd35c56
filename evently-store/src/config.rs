//! Database configuration read from the environment
//!
//! Environment variables:
//!   DATABASE_URL                      # required, PostgreSQL connection URI
//!   EVENTLY_DB_MAX_CONNECTIONS        # pool size (default: 5)
//!   EVENTLY_DB_CONNECT_TIMEOUT_SECS   # connect/acquire timeout (default: 5)

use std::time::Duration;

use crate::connection::ConnectError;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "EVENTLY_DB_MAX_CONNECTIONS";
pub const CONNECT_TIMEOUT_VAR: &str = "EVENTLY_DB_CONNECT_TIMEOUT_SECS";

/// Default maximum connections for the pool.
/// Kept low; one process shares a single pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Read settings from the process environment.
    ///
    /// Does not load `.env` files; binaries do that once at startup.
    pub fn from_env() -> Result<Self, ConnectError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConnectError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_VAR)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConnectError::Config(format!("{} must be set", DATABASE_URL_VAR)))?;

        let mut config = Self::new(database_url);

        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = parse_positive(MAX_CONNECTIONS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR) {
            config.connect_timeout = Duration::from_secs(parse_positive(CONNECT_TIMEOUT_VAR, &raw)?);
        }

        Ok(config)
    }
}

fn parse_positive<T>(var: &str, raw: &str) -> Result<T, ConnectError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConnectError::Config(format!(
            "{} must be a positive integer, got '{}'",
            var, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = DbConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "postgres://localhost/evently")])).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/evently");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_url_is_config_error() {
        let err = DbConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConnectError::Config(ref msg) if msg.contains("DATABASE_URL")));

        let err = DbConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConnectError::Config(_)));
    }

    #[test]
    fn overrides() {
        let config = DbConfig::from_lookup(lookup(&[
            (DATABASE_URL_VAR, "postgres://db/evently"),
            (MAX_CONNECTIONS_VAR, "12"),
            (CONNECT_TIMEOUT_VAR, "2"),
        ]))
        .unwrap();
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn malformed_numbers_rejected() {
        for bad in ["zero", "0", "-3"] {
            let err = DbConfig::from_lookup(lookup(&[
                (DATABASE_URL_VAR, "postgres://db/evently"),
                (MAX_CONNECTIONS_VAR, bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConnectError::Config(ref msg) if msg.contains(MAX_CONNECTIONS_VAR)));
        }
    }
}
