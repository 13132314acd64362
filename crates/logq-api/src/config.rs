//! HTTP service configuration.

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Parser TOML config (LOGQ_CONFIG). Built-in defaults when unset.
    #[serde(default)]
    pub parser_config: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ApiConfig {
    /// Load config from `LOGQ_HOST`, `LOGQ_PORT` and `LOGQ_CONFIG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("LOGQ_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid LOGQ_PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };
        Self {
            host: lookup("LOGQ_HOST").unwrap_or(defaults.host),
            port,
            parser_config: lookup("LOGQ_CONFIG").filter(|p| !p.trim().is_empty()),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            parser_config: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(config.parser_config.is_none());
    }

    #[test]
    fn env_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("LOGQ_HOST", "127.0.0.1"),
            ("LOGQ_PORT", "9090"),
            ("LOGQ_CONFIG", "/etc/logq/logq.toml"),
        ]));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.parser_config.as_deref(), Some("/etc/logq/logq.toml"));
    }

    #[test]
    fn bad_port_falls_back() {
        let config = ApiConfig::from_lookup(lookup(&[("LOGQ_PORT", "eighty"), ("LOGQ_CONFIG", " ")]));
        assert_eq!(config.port, 8000);
        assert!(config.parser_config.is_none());
    }
}
