//! Error types and Result aliases for netconsole

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::models::ProfileError;
use crate::transport::{ConnectError, RunError};

/// Result type alias for netconsole operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netconsole
#[derive(Debug)]
pub enum Error {
    // === Console errors ===
    /// Connection profile failed validation
    Profile(ProfileError),

    /// Manually entered command was blank
    EmptyCommand,

    /// Action is not accepted in the console's current state
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// No dispatch is waiting to be executed
    NoPendingDispatch,

    /// A completion arrived for a dispatch that is no longer in flight
    StaleDispatch {
        id: Uuid,
    },

    // === Transport errors ===
    /// Session could not be opened
    Connect(ConnectError),

    /// Command failed or timed out on an open session
    Run(RunError),

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration file not found
    ConfigNotFound,

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    /// Failed to serialize configuration
    ConfigSerializationFailed {
        format: String,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    // === I/O errors ===
    /// Filesystem or runtime I/O failure
    Io(std::io::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Console errors
            Error::Profile(err) => write!(f, "{}", err),
            Error::EmptyCommand => {
                write!(f, "Command cannot be empty")
            }
            Error::InvalidTransition { state, action } => {
                write!(f, "Action '{}' is not available while {}", action, state)
            }
            Error::NoPendingDispatch => {
                write!(f, "No command is waiting to be dispatched")
            }
            Error::StaleDispatch { id } => {
                write!(f, "Dispatch '{}' is no longer in flight", id)
            }

            // Transport errors
            Error::Connect(err) => write!(f, "{}", err),
            Error::Run(err) => write!(f, "{}", err),

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigNotFound => {
                write!(f, "Configuration file not found")
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }
            Error::ConfigSerializationFailed { format, reason } => {
                write!(f, "Failed to serialize config as {}: {}", format, reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }

            // I/O errors
            Error::Io(err) => write!(f, "I/O error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ProfileError> for Error {
    fn from(err: ProfileError) -> Self {
        Error::Profile(err)
    }
}

impl From<ConnectError> for Error {
    fn from(err: ConnectError) -> Self {
        Error::Connect(err)
    }
}

impl From<RunError> for Error {
    fn from(err: RunError) -> Self {
        Error::Run(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
