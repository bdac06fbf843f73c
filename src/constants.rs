//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Demo wallet address assigned on connect
pub const DEFAULT_WALLET_ADDRESS: &str = "addr_algorand_test_1234567890abcdef";

/// Simulated contract latency for registration, in milliseconds
pub const DEFAULT_REGISTER_DELAY_MS: u64 = 2000;

/// Simulated contract latency for certificate issuance, in milliseconds
pub const DEFAULT_CERTIFICATE_DELAY_MS: u64 = 2000;

/// Simulated contract latency for ownership transfer, in milliseconds
pub const DEFAULT_TRANSFER_DELAY_MS: u64 = 2000;

/// Simulated verification latency, in milliseconds
pub const DEFAULT_VERIFY_DELAY_MS: u64 = 1500;

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "landchain.log";

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "LANDCHAIN_CONFIG";

/// Maximum number of activity entries kept in memory
pub const MAX_ACTIVITY: usize = 50;

/// Application name
pub const APP_NAME: &str = "LandChain";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
