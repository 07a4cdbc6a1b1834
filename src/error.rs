//! Error types for the device contacts layer.
//!
//! `ContactError` is data handed to failure handlers, not something this crate
//! raises. The remaining types use `thiserror` for precise internal error handling.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Closed set of error codes understood by the native contacts store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactErrorCode {
    Unknown,
    InvalidArgument,
    NotFound,
    Timeout,
    PendingOperation,
    Io,
    NotSupported,
    PermissionDenied,
}

impl ContactErrorCode {
    /// Numeric wire value of this code.
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Unknown => 0,
            Self::InvalidArgument => 1,
            Self::NotFound => 2,
            Self::Timeout => 3,
            Self::PendingOperation => 4,
            Self::Io => 5,
            Self::NotSupported => 6,
            Self::PermissionDenied => 20,
        }
    }

    /// Map a numeric wire value back to a code.
    ///
    /// Numbers outside the enumeration map to `Unknown`.
    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => Self::InvalidArgument,
            2 => Self::NotFound,
            3 => Self::Timeout,
            4 => Self::PendingOperation,
            5 => Self::Io,
            6 => Self::NotSupported,
            20 => Self::PermissionDenied,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ContactErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT_ERROR",
            Self::NotFound => "NOT_FOUND_ERROR",
            Self::Timeout => "TIMEOUT_ERROR",
            Self::PendingOperation => "PENDING_OPERATION_ERROR",
            Self::Io => "IO_ERROR",
            Self::NotSupported => "NOT_SUPPORTED_ERROR",
            Self::PermissionDenied => "PERMISSION_DENIED_ERROR",
        };
        write!(f, "{} ({})", name, self.as_u16())
    }
}

// Serde support - the code travels as its bare number
impl Serialize for ContactErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for ContactErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u16::deserialize(deserializer)?;
        Ok(Self::from_u16(code))
    }
}

/// Error value delivered to a caller's failure handler.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("contact error: {code}")]
pub struct ContactError {
    pub code: ContactErrorCode,
}

impl ContactError {
    pub fn new(code: ContactErrorCode) -> Self {
        Self { code }
    }

    pub fn not_found() -> Self {
        Self::new(ContactErrorCode::NotFound)
    }

    pub fn timeout() -> Self {
        Self::new(ContactErrorCode::Timeout)
    }
}

/// Errors that can occur while turning native payloads into contacts.
#[derive(Error, Debug)]
pub enum MarshalError {
    /// Payload text is not valid JSON, or a field has the wrong type
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Payload is neither a JSON object nor a JSON-encoded string
    #[error("Unexpected payload shape: expected {expected}, got {actual}")]
    UnexpectedShape {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with MarshalError
pub type MarshalResult<T> = Result<T, MarshalError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
