//! Configuration and credentials.
//!
//! # Responsibilities
//! - Define the transport pool configuration with serde defaults
//! - Load and validate configuration from a TOML file
//! - Resolve API credentials from the process environment, explicitly

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the API access key.
pub const ACCESS_KEY_VAR: &str = "IDILIA_ACCESS_KEY";
/// Environment variable holding the API private key.
pub const PRIVATE_KEY_VAR: &str = "IDILIA_PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configured value is out of range.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required credential environment variable is unset or empty.
    #[error("missing credential environment variable {0}")]
    MissingCredentials(&'static str),
}

/// Transport pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Maximum number of client handles checked out at once.
    pub max_clients: usize,
    /// How long `shutdown_and_wait` waits for outstanding handles.
    pub shutdown_grace_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_clients: 8,
            shutdown_grace_secs: 5,
        }
    }
}

impl TransportConfig {
    /// Check configured values for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_clients == 0 {
            return Err(ConfigError::Validation(
                "max_clients must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a transport configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<TransportConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: TransportConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// API credentials for the remote service.
///
/// Resolved once, explicitly, and owned by the transport. Per-call
/// credential injection is intentionally not offered.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    private_key: String,
}

impl Credentials {
    /// Build credentials from explicit key material.
    pub fn new(access_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Read credentials from `IDILIA_ACCESS_KEY` / `IDILIA_PRIVATE_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_key = env::var(ACCESS_KEY_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredentials(ACCESS_KEY_VAR))?;
        let private_key = env::var(PRIVATE_KEY_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredentials(PRIVATE_KEY_VAR))?;
        Ok(Self::new(access_key, private_key))
    }

    /// The public access key.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The private signing key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

// Keep the private key out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.max_clients, 8);
        assert_eq!(config.shutdown_grace_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_clients() {
        let config = TransportConfig {
            max_clients: 0,
            ..TransportConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_clients"));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: TransportConfig = toml::from_str("max_clients = 2").unwrap();
        assert_eq!(config.max_clients, 2);
        // Unset fields fall back to defaults
        assert_eq!(config.shutdown_grace_secs, 5);
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join("sense-pipeline-test-config.toml");
        fs::write(&path, "max_clients = 3\nshutdown_grace_secs = 2\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_clients, 3);
        assert_eq!(config.shutdown_grace_secs, 2);

        fs::write(&path, "max_clients = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_credentials_debug_redacts_private_key() {
        let creds = Credentials::new("AK123", "very-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("AK123"));
        assert!(!rendered.contains("very-secret"));
    }
}
