use thiserror::Error;

use crate::config::types::{Config, DbSettings, ProxySettings};
use crate::strategy::StrategyName;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable '{name}'")]
    MissingVar { name: &'static str },

    #[error("Invalid value '{value}' for '{name}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// The seam exists so tests can feed a plain map instead of mutating
    /// process-global environment state.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let manager_host = require(&get, "MANAGER_HOST")?;
        let worker_hosts = get("WORKER_HOSTS")
            .map(|raw| split_hosts(&raw))
            .unwrap_or_default();

        let db = DbSettings {
            user: require(&get, "DB_USER")?,
            password: require(&get, "DB_PASSWORD")?,
            database: get("DB_NAME").unwrap_or_else(|| "sakila".to_string()),
            port: parse_port(&get)?,
        };

        let default_strategy = match get("PROXY_STRATEGY") {
            Some(raw) => StrategyName::parse(&raw).ok_or_else(|| ConfigError::InvalidVar {
                name: "PROXY_STRATEGY",
                value: raw,
                reason: "expected one of: direct, random, custom".to_string(),
            })?,
            None => StrategyName::Direct,
        };

        let proxy = ProxySettings {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string()),
            default_strategy,
            replicate_writes: bool_var(&get, "REPLICATE_WRITES"),
            debug: bool_var(&get, "DEBUG"),
        };

        Ok(Config {
            manager_host,
            worker_hosts,
            db,
            proxy,
        })
    }
}

fn require(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

fn parse_port(get: &impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
    match get("DB_PORT") {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
            name: "DB_PORT",
            value: raw,
            reason: "expected a port number".to_string(),
        }),
        None => Ok(3306),
    }
}

fn bool_var(get: &impl Fn(&str) -> Option<String>, name: &str) -> bool {
    get(name).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn minimal_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("MANAGER_HOST", "10.0.1.10"),
            ("DB_USER", "proxyuser"),
            ("DB_PASSWORD", "secret"),
        ]
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = Config::from_lookup(env(&minimal_env())).unwrap();

        assert_eq!(config.manager_host, "10.0.1.10");
        assert!(config.worker_hosts.is_empty());
        assert_eq!(config.db.database, "sakila");
        assert_eq!(config.db.port, 3306);
        assert_eq!(config.proxy.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.proxy.default_strategy, StrategyName::Direct);
        assert!(!config.proxy.replicate_writes);
        assert!(!config.proxy.debug);
    }

    #[test]
    fn worker_hosts_split_and_trimmed() {
        let mut vars = minimal_env();
        vars.push(("WORKER_HOSTS", " 10.0.1.11 , 10.0.1.12 ,"));
        let config = Config::from_lookup(env(&vars)).unwrap();
        assert_eq!(config.worker_hosts, vec!["10.0.1.11", "10.0.1.12"]);
    }

    #[test]
    fn empty_worker_hosts_is_allowed() {
        let mut vars = minimal_env();
        vars.push(("WORKER_HOSTS", ""));
        let config = Config::from_lookup(env(&vars)).unwrap();
        assert!(config.worker_hosts.is_empty());
    }

    #[test]
    fn missing_manager_host_errors() {
        let err = Config::from_lookup(env(&[("DB_USER", "u"), ("DB_PASSWORD", "p")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { name: "MANAGER_HOST" }));
    }

    #[test]
    fn blank_required_var_counts_as_missing() {
        let mut vars = minimal_env();
        vars[1] = ("DB_USER", "   ");
        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { name: "DB_USER" }));
    }

    #[test]
    fn unknown_default_strategy_is_rejected() {
        let mut vars = minimal_env();
        vars.push(("PROXY_STRATEGY", "round-robin"));
        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "PROXY_STRATEGY", .. }));
    }

    #[test]
    fn custom_strategy_and_flags_parse() {
        let mut vars = minimal_env();
        vars.extend([
            ("PROXY_STRATEGY", "custom"),
            ("REPLICATE_WRITES", "TRUE"),
            ("DEBUG", "true"),
            ("DB_PORT", "3307"),
            ("BIND_ADDR", "127.0.0.1:5001"),
        ]);
        let config = Config::from_lookup(env(&vars)).unwrap();

        assert_eq!(config.proxy.default_strategy, StrategyName::Custom);
        assert!(config.proxy.replicate_writes);
        assert!(config.proxy.debug);
        assert_eq!(config.db.port, 3307);
        assert_eq!(config.proxy.bind_addr, "127.0.0.1:5001");
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut vars = minimal_env();
        vars.push(("DB_PORT", "not-a-port"));
        let err = Config::from_lookup(env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "DB_PORT", .. }));
    }
}
