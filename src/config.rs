//! Configuration management for the contacts layer.
//!
//! Every value is optional. Defaults keep the historical behavior of the
//! device contacts API: single-slot result delivery and fail-fast batches.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::str::FromStr;

/// How success results are matched to the request that asked for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationMode {
    /// One pending result handler, overwritten by every new request.
    ///
    /// A response is delivered to whichever handler was registered last,
    /// even when it answers an older request.
    #[default]
    SingleSlot,

    /// Each request keeps its own handler, keyed by its request id.
    PerRequest,
}

impl FromStr for CorrelationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-slot" | "single_slot" => Ok(Self::SingleSlot),
            "per-request" | "per_request" => Ok(Self::PerRequest),
            other => Err(format!(
                "Must be 'single-slot' or 'per-request', got: {}",
                other
            )),
        }
    }
}

/// What to do with a result batch that contains a malformed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// One malformed entry discards the whole batch.
    #[default]
    FailFast,

    /// Malformed entries are logged and skipped.
    SkipInvalid,
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            "skip-invalid" | "skip_invalid" => Ok(Self::SkipInvalid),
            other => Err(format!(
                "Must be 'fail-fast' or 'skip-invalid', got: {}",
                other
            )),
        }
    }
}

/// Configuration for the contacts service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name used to build bridge command identifiers (default: "Contacts")
    pub service_name: String,

    /// Result correlation strategy (default: single-slot)
    pub correlation: CorrelationMode,

    /// Batch deserialization policy (default: fail-fast)
    pub batch_policy: BatchPolicy,

    /// Timeout for the future-based API in seconds, 0 disables (default: 30)
    pub request_timeout: u64,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `CONTACTS_SERVICE_NAME`: bridge service name (default: "Contacts")
    /// - `CONTACTS_CORRELATION`: `single-slot` or `per-request` (default: single-slot)
    /// - `CONTACTS_BATCH_POLICY`: `fail-fast` or `skip-invalid` (default: fail-fast)
    /// - `CONTACTS_REQUEST_TIMEOUT`: timeout in seconds, 0 disables (default: 30)
    /// - `LOG_LEVEL`: logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let service_name =
            env::var("CONTACTS_SERVICE_NAME").unwrap_or_else(|_| "Contacts".to_string());
        if service_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "CONTACTS_SERVICE_NAME".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let correlation = Self::parse_env("CONTACTS_CORRELATION", CorrelationMode::default())?;
        let batch_policy = Self::parse_env("CONTACTS_BATCH_POLICY", BatchPolicy::default())?;
        let request_timeout = Self::parse_env_u64("CONTACTS_REQUEST_TIMEOUT", 30)?;
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            service_name,
            correlation,
            batch_policy,
            request_timeout,
            log_level,
        })
    }

    /// Same configuration with a different correlation mode.
    pub fn with_correlation(mut self, correlation: CorrelationMode) -> Self {
        self.correlation = correlation;
        self
    }

    /// Same configuration with a different batch policy.
    pub fn with_batch_policy(mut self, batch_policy: BatchPolicy) -> Self {
        self.batch_policy = batch_policy;
        self
    }

    /// Parse an environment variable through `FromStr` with a default value.
    fn parse_env<T>(var_name: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr<Err = String>,
    {
        match env::var(var_name) {
            Ok(val) => val.parse::<T>().map_err(|reason| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason,
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service_name: "Contacts".to_string(),
            correlation: CorrelationMode::SingleSlot,
            batch_policy: BatchPolicy::FailFast,
            request_timeout: 30,
            log_level: "error".to_string(),
        }
    }
}
