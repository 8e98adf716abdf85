//! Client configuration
//!
//! Loaded once from a TOML file and passed by reference to whatever needs it.

use crate::address::AddressVersions;
use crate::coloring::EngineConfig;
use crate::error::ConfigError;
use crate::provider::RpcAuth;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub bitcoind: BitcoindConfig,
    pub environment: AddressVersions,
    #[serde(default)]
    pub coloring: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BitcoindConfig {
    pub rpc_url: String,
    #[serde(default)]
    pub rpc_user: Option<String>,
    #[serde(default)]
    pub rpc_password: Option<String>,
    #[serde(default)]
    pub rpc_cookie_file: Option<PathBuf>,
}

impl BitcoindConfig {
    /// Cookie file takes precedence over user and password
    pub fn auth(&self) -> RpcAuth {
        if let Some(path) = &self.rpc_cookie_file {
            return RpcAuth::CookieFile(path.clone());
        }
        match (&self.rpc_user, &self.rpc_password) {
            (Some(user), Some(password)) => RpcAuth::UserPass(user.clone(), password.clone()),
            (Some(user), None) => RpcAuth::UserPass(user.clone(), String::new()),
            _ => RpcAuth::None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}
