use dotenv::dotenv;
use crate::errors::{ErrorKind, Result};
use std::env::{self, VarError};
use std::time::Duration;

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Process configuration, read from the environment (and `.env` if present).
///
/// Required:
/// - `DATABASE_URL`
///
/// Optional:
/// - `DATABASE_POOL_SIZE` (default: 10)
/// - `DATABASE_CONNECT_TIMEOUT_SECS` (default: 5)
/// - `LOG_FORMAT` (`pretty` or `json`, default: `pretty`)
///
/// Bind address and port are Rocket's own settings (`Rocket.toml`, `ROCKET_PORT`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub pool_size: u32,
    pub connect_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_vars(|key| env::var(key))
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> ::std::result::Result<String, VarError>,
    {
        let database_url = var("DATABASE_URL")?;

        let pool_size = match optional(&var, "DATABASE_POOL_SIZE")? {
            Some(raw) => raw.trim().parse::<u32>()?,
            None => DEFAULT_POOL_SIZE,
        };
        if pool_size == 0 {
            return Err(ErrorKind::InvalidSetting("DATABASE_POOL_SIZE", pool_size.to_string()).into());
        }

        let connect_timeout = match optional(&var, "DATABASE_CONNECT_TIMEOUT_SECS")? {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>()?),
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let log_format = match optional(&var, "LOG_FORMAT")? {
            None => LogFormat::Pretty,
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "" | "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ErrorKind::InvalidSetting("LOG_FORMAT", raw).into()),
            },
        };

        Ok(AppConfig {
            database_url,
            pool_size,
            connect_timeout,
            log_format,
        })
    }
}

fn optional<F>(var: &F, key: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> ::std::result::Result<String, VarError>,
{
    match var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> ::std::result::Result<String, VarError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = AppConfig::from_vars(lookup(&[("DATABASE_URL", "postgres://localhost/news")])).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/news");
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.connect_timeout, Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(AppConfig::from_vars(lookup(&[])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_vars(lookup(&[
            ("DATABASE_URL", "postgres://db/news"),
            ("DATABASE_POOL_SIZE", "3"),
            ("DATABASE_CONNECT_TIMEOUT_SECS", "1"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.pool_size, 3);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_numbers_and_formats() {
        let base = [("DATABASE_URL", "postgres://db/news")];
        let bad_size = [base[0], ("DATABASE_POOL_SIZE", "lots")];
        assert!(AppConfig::from_vars(lookup(&bad_size)).is_err());

        let zero_size = [base[0], ("DATABASE_POOL_SIZE", "0")];
        assert!(AppConfig::from_vars(lookup(&zero_size)).is_err());

        let bad_format = [base[0], ("LOG_FORMAT", "xml")];
        assert!(AppConfig::from_vars(lookup(&bad_format)).is_err());
    }
}
