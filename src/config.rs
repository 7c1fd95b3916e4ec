//! Runtime configuration read from the environment.

use std::env;
use std::net::SocketAddr;

use crate::session::CookiePolicy;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub seed_database: bool,
    pub cookies: CookiePolicy,
}

fn invalid(name: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Ok(false),
        other => Err(invalid(name, other, "expected a boolean")),
    }
}

impl Config {
    /// Reads configuration through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse()
            .map_err(|e| invalid("BIND_ADDR", &bind_raw, e))?;

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => return Err(invalid("DATABASE_MAX_CONNECTIONS", &raw, "must be at least 1")),
                Ok(n) => n,
                Err(e) => return Err(invalid("DATABASE_MAX_CONNECTIONS", &raw, e)),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let seed_database = match get("SEED_DATABASE") {
            Some(raw) => parse_bool("SEED_DATABASE", &raw)?,
            None => true,
        };

        let secure = match get("COOKIE_SECURE") {
            Some(raw) => parse_bool("COOKIE_SECURE", &raw)?,
            None => false,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_addr,
            max_connections,
            seed_database,
            cookies: CookiePolicy {
                domain: get("COOKIE_DOMAIN"),
                secure,
                ..CookiePolicy::default()
            },
        })
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }
}
