//! Configuration loading and representation.
//!
//! Everything is read from environment variables:
//!
//! | variable | default |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | required when persistent |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `RUN_MIGRATIONS` | `true` |

use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

/// Which storage engine backs the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local stores (dev/test). State is lost on restart.
    InMemory,
    Postgres(DatabaseConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or("BIND_ADDR", lookup("BIND_ADDR"), || {
            DEFAULT_BIND_ADDR.parse().ok()
        })?;

        let persistent = parse_or("USE_PERSISTENT_STORES", lookup("USE_PERSISTENT_STORES"), || {
            Some(false)
        })?;

        let storage = if persistent {
            let url = lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = parse_or(
                "DATABASE_MAX_CONNECTIONS",
                lookup("DATABASE_MAX_CONNECTIONS"),
                || Some(DEFAULT_MAX_CONNECTIONS),
            )?;
            if max_connections == 0 {
                return Err(ConfigError::Invalid {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: "0".to_string(),
                });
            }
            let run_migrations =
                parse_or("RUN_MIGRATIONS", lookup("RUN_MIGRATIONS"), || Some(true))?;

            StorageConfig::Postgres(DatabaseConfig {
                url,
                max_connections,
                run_migrations,
            })
        } else {
            StorageConfig::InMemory
        };

        Ok(Self { bind_addr, storage })
    }
}

fn parse_or<T, D>(key: &'static str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    D: FnOnce() -> Option<T>,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => default().ok_or(ConfigError::Invalid {
            key,
            value: String::new(),
        }),
    }
}
