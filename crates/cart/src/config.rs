//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_STORAGE_KEY` - Key the cart is persisted under (default: `@GoMarketPlace:products`)
//! - `CART_STORAGE_DIR` - Directory used by the file-backed store (default: `.cart`)
//! - `CART_PRUNE_EMPTY` - Drop lines whose quantity reaches zero on decrement (default: false)
//! - `CART_STRICT_HYDRATION` - Fail loading on malformed persisted data instead of
//!   starting with an empty cart (default: false)
//! - `CART_PERSIST_ATTEMPTS` - Write attempts per snapshot, at least 1 (default: 1)
//! - `CART_PERSIST_BACKOFF_MS` - Delay before retry `n` is `n * backoff` (default: 100)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:products";

const DEFAULT_STORAGE_DIR: &str = ".cart";
const DEFAULT_BACKOFF_MS: u64 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key the serialized cart is stored under
    pub storage_key: String,
    /// Directory for the file-backed store
    pub storage_dir: PathBuf,
    /// Remove lines at or below zero after a decrement
    pub prune_empty: bool,
    /// Treat malformed persisted data as an error instead of an empty cart
    pub strict_hydration: bool,
    /// Write retry policy
    pub persist: PersistPolicy,
}

/// How persistence failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistPolicy {
    /// Total attempts per snapshot (always at least 1)
    pub max_attempts: u32,
    /// Base delay; the wait before attempt `n + 1` is `n * backoff`
    pub backoff: Duration,
}

impl Default for PersistPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            prune_empty: false,
            strict_hydration: false,
            persist: PersistPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage_dir = PathBuf::from(get_env_or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let prune_empty = parse_bool("CART_PRUNE_EMPTY", get_optional_env("CART_PRUNE_EMPTY"))?;
        let strict_hydration = parse_bool(
            "CART_STRICT_HYDRATION",
            get_optional_env("CART_STRICT_HYDRATION"),
        )?;

        let max_attempts = parse_attempts(
            "CART_PERSIST_ATTEMPTS",
            get_optional_env("CART_PERSIST_ATTEMPTS"),
        )?;
        let backoff_ms = get_env_or_default("CART_PERSIST_BACKOFF_MS", "100")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_PERSIST_BACKOFF_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            storage_key,
            storage_dir,
            prune_empty,
            strict_hydration,
            persist: PersistPolicy {
                max_attempts,
                backoff: Duration::from_millis(backoff_ms),
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag. Unset means `false`.
fn parse_bool(key: &str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse the attempt count, rejecting zero.
fn parse_attempts(key: &str, value: Option<String>) -> Result<u32, ConfigError> {
    let Some(value) = value else {
        return Ok(1);
    };

    let attempts = value
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if attempts == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(attempts)
}
