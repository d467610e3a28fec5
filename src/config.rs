//! Configuration Management
//!
//! Connection settings for the AWX API. Values come from, in order of
//! precedence: command line flags, the config file, the environment, and
//! built-in defaults.

use crate::awx::auth::{self, AwxCredentials};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Host used when nothing else is configured
pub const DEFAULT_HOST: &str = "http://localhost";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// AWX host, e.g. `https://awx.example.com`
    #[serde(default)]
    pub host: Option<String>,
    /// Basic-auth username
    #[serde(default)]
    pub username: Option<String>,
    /// Basic-auth password
    #[serde(default)]
    pub password: Option<String>,
    /// OAuth2 token, preferred over username/password
    #[serde(default)]
    pub token: Option<String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: Option<bool>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tawx").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file, falling back to defaults if it is
    /// missing or malformed
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Overlay values given on the command line
    pub fn merge(self, overrides: Config) -> Self {
        Self {
            host: overrides.host.or(self.host),
            username: overrides.username.or(self.username),
            password: overrides.password.or(self.password),
            token: overrides.token.or(self.token),
            insecure: overrides.insecure.or(self.insecure),
        }
    }

    /// Get effective host (CLI > config > AWX_HOST > default)
    pub fn effective_host(&self) -> String {
        self.host
            .clone()
            .or_else(auth::host_from_env)
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    /// Get effective credentials (CLI > config > environment)
    pub fn effective_credentials(&self) -> AwxCredentials {
        AwxCredentials::resolve(
            self.token.clone().or_else(|| auth::env_var(auth::TOKEN_ENV)),
            self.username
                .clone()
                .or_else(|| auth::env_var(auth::USERNAME_ENV)),
            self.password
                .clone()
                .or_else(|| auth::env_var(auth::PASSWORD_ENV)),
        )
    }

    /// Get effective TLS verification setting
    pub fn effective_insecure(&self) -> bool {
        self.insecure
            .or_else(|| auth::flag_from_env(auth::INSECURE_ENV))
            .unwrap_or(false)
    }
}
