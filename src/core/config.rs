//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally through a `.env` file) or defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default Azure DevOps collection name.
pub const DEFAULT_COLLECTION: &str = "DefaultCollection";

/// Default REST API version.
pub const DEFAULT_API_VERSION: &str = "7.0";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Azure DevOps connection settings.
    pub ado: AdoConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Connection settings for the Azure DevOps instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdoConfig {
    /// Server URL, e.g. `https://dev.azure.com` or `https://tfs.example.com/tfs`.
    pub base_url: String,

    /// Collection (or organization) name.
    pub collection: String,

    /// Personal access token.
    pub pat: String,

    /// Default project for project-scoped calls.
    pub project: String,

    /// Value of the `api-version` query parameter.
    pub api_version: String,
}

/// Custom Debug implementation to redact the token from logs.
impl std::fmt::Debug for AdoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdoConfig")
            .field("base_url", &self.base_url)
            .field("collection", &self.collection)
            .field("pat", &"[REDACTED]")
            .field("project", &self.project)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Default for AdoConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            collection: DEFAULT_COLLECTION.to_string(),
            pat: String::new(),
            project: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl AdoConfig {
    /// Load the Azure DevOps settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the settings from a variable lookup.
    ///
    /// `ADO_BASE_URL`, `ADO_PAT` and `ADO_PROJECT` are required; empty values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::config(format!("{key} environment variable is required")))
        };

        Ok(Self {
            base_url: require("ADO_BASE_URL")?,
            collection: get("ADO_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            pat: require("ADO_PAT")?,
            project: require("ADO_PROJECT")?,
            api_version: get("ADO_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "azure-devops".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            ado: AdoConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`, ...). Azure DevOps settings use the
    /// `ADO_` prefix; a missing required one is an error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        config.ado = AdoConfig::from_env()?;
        info!(
            "Azure DevOps target: {}/{} (project {}, api-version {})",
            config.ado.base_url, config.ado.collection, config.ado.project, config.ado.api_version
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_ado_config_defaults_applied() {
        let config = AdoConfig::from_lookup(lookup(&[
            ("ADO_BASE_URL", "https://tfs.example.com/tfs"),
            ("ADO_PAT", "secret"),
            ("ADO_PROJECT", "Proj"),
        ]))
        .unwrap();
        assert_eq!(config.collection, "DefaultCollection");
        assert_eq!(config.api_version, "7.0");
        assert_eq!(config.project, "Proj");
    }

    #[test]
    fn test_ado_config_overrides() {
        let config = AdoConfig::from_lookup(lookup(&[
            ("ADO_BASE_URL", "https://dev.azure.com"),
            ("ADO_COLLECTION", "contoso"),
            ("ADO_PAT", "secret"),
            ("ADO_PROJECT", "Proj"),
            ("ADO_API_VERSION", "7.1"),
        ]))
        .unwrap();
        assert_eq!(config.collection, "contoso");
        assert_eq!(config.api_version, "7.1");
    }

    #[test]
    fn test_ado_config_missing_required() {
        for missing in ["ADO_BASE_URL", "ADO_PAT", "ADO_PROJECT"] {
            let vars: Vec<(&str, &str)> = [
                ("ADO_BASE_URL", "https://dev.azure.com"),
                ("ADO_PAT", "secret"),
                ("ADO_PROJECT", "Proj"),
            ]
            .into_iter()
            .filter(|(k, _)| *k != missing)
            .collect();

            let err = AdoConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            assert!(err.to_string().contains(missing));
        }
    }

    #[test]
    fn test_ado_config_empty_counts_as_missing() {
        let result = AdoConfig::from_lookup(lookup(&[
            ("ADO_BASE_URL", "https://dev.azure.com"),
            ("ADO_PAT", ""),
            ("ADO_PROJECT", "Proj"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_pat_redacted_in_debug() {
        let config = AdoConfig {
            pat: "super_secret_pat".to_string(),
            ..AdoConfig::default()
        };
        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_pat"));
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("ADO_BASE_URL", "https://dev.example.com/");
            std::env::set_var("ADO_PAT", "env_pat");
            std::env::set_var("ADO_PROJECT", "EnvProj");
            std::env::set_var("MCP_SERVER_NAME", "ado-test");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.ado.project, "EnvProj");
        assert_eq!(config.server.name, "ado-test");
        unsafe {
            std::env::remove_var("ADO_BASE_URL");
            std::env::remove_var("ADO_PAT");
            std::env::remove_var("ADO_PROJECT");
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }
}
