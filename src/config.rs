use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_ENV_VAR, DEFAULT_CERTIFICATE_DELAY_MS, DEFAULT_LOG_FILE, DEFAULT_REGISTER_DELAY_MS,
    DEFAULT_TRANSFER_DELAY_MS, DEFAULT_VERIFY_DELAY_MS, DEFAULT_WALLET_ADDRESS,
};

/// Simulated contract latencies
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    pub register_ms: u64,
    pub certificate_ms: u64,
    pub transfer_ms: u64,
    pub verify_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Delays {
            register_ms: DEFAULT_REGISTER_DELAY_MS,
            certificate_ms: DEFAULT_CERTIFICATE_DELAY_MS,
            transfer_ms: DEFAULT_TRANSFER_DELAY_MS,
            verify_ms: DEFAULT_VERIFY_DELAY_MS,
        }
    }
}

impl Delays {
    /// No waiting at all, handy for tests
    pub fn none() -> Self {
        Delays {
            register_ms: 0,
            certificate_ms: 0,
            transfer_ms: 0,
            verify_ms: 0,
        }
    }

    pub fn register(&self) -> Duration {
        Duration::from_millis(self.register_ms)
    }

    pub fn certificate(&self) -> Duration {
        Duration::from_millis(self.certificate_ms)
    }

    pub fn transfer(&self) -> Duration {
        Duration::from_millis(self.transfer_ms)
    }

    pub fn verify(&self) -> Duration {
        Duration::from_millis(self.verify_ms)
    }
}

/// User configuration, read from `~/.landchain/config.yaml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address reported by the demo wallet on connect
    pub wallet_address: String,
    /// Load the sample parcels when a wallet connects
    pub seed_mock_data: bool,
    pub delays: Delays,
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wallet_address: String::from(DEFAULT_WALLET_ADDRESS),
            seed_mock_data: true,
            delays: Delays::default(),
            log_file: String::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Config file location: `$LANDCHAIN_CONFIG`, else `~/.landchain/config.yaml`
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".landchain")
            .join("config.yaml")
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}
