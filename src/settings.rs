//! Process settings from the environment (`.env` supported via dotenvy).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/sales";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Connection string selecting the target database.
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
}

impl Settings {
    /// Load `.env` if present, then read `DATABASE_URL`, `BIND_ADDR` and `DB_MAX_CONNECTIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            return Err(ConfigError::Setting {
                key: "DATABASE_URL",
                message: "expected a postgres:// connection string".into(),
            });
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Setting {
                key: "BIND_ADDR",
                message: e.to_string(),
            })?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Setting {
                    key: "DB_MAX_CONNECTIONS",
                    message: format!("expected a positive integer, got '{}'", v),
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Settings {
            database_url,
            bind_addr,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(s.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn reads_overrides() {
        let s = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://u:p@db:5432/shop"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(s.database_url, "postgresql://u:p@db:5432/shop");
        assert_eq!(s.bind_addr.port(), 8080);
        assert_eq!(s.max_connections, 12);
    }

    #[test]
    fn rejects_invalid_values() {
        let err = Settings::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Setting { key: "DB_MAX_CONNECTIONS", .. }));
        let err = Settings::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::Setting { key: "BIND_ADDR", .. }));
        let err = Settings::from_lookup(lookup(&[("DATABASE_URL", "mysql://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Setting { key: "DATABASE_URL", .. }));
    }
}
