//! Transport Abstraction
//!
//! The console never talks to a device directly. It hands a validated
//! [`ConnectionProfile`] to a [`Transport`], which opens a [`Session`] that
//! runs commands and returns their raw text output.
//!
//! This abstraction allows for:
//! - Unit testing the console with scripted transports
//! - Swapping SSH for another remote-shell protocol without touching dispatch
//!
//! ## Security Note
//!
//! Neither [`ConnectError`] nor [`RunError`] ever carries credentials. Only
//! the host and a reason are reported.

pub mod ssh;

use std::time::Duration;

use async_trait::async_trait;

use crate::models::ConnectionProfile;

pub use ssh::SshTransport;

/// Failure to open a session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to connect to '{host}': {reason}")]
pub struct ConnectError {
    pub host: String,
    pub reason: String,
}

impl ConnectError {
    pub fn new(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a command on an open session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("Command '{command}' timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    #[error("Command '{command}' failed: {reason}")]
    Failed { command: String, reason: String },

    #[error("Session is closed")]
    Closed,
}

/// Opens remote sessions
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a session for `profile`, giving up after `timeout`
    ///
    /// # Errors
    /// Returns [`ConnectError`] if the device is unreachable, the handshake
    /// fails or the credentials are rejected
    async fn connect(
        &self,
        profile: &ConnectionProfile,
        timeout: Duration,
    ) -> Result<Box<dyn Session>, ConnectError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// An open remote session
#[async_trait]
pub trait Session: Send {
    /// Run one command and collect its output
    ///
    /// # Errors
    /// Returns [`RunError::Timeout`] if no result arrives within `timeout`
    async fn run(&mut self, command: &str, timeout: Duration) -> Result<String, RunError>;

    /// Close the session. Closing twice is not an error.
    async fn close(&mut self) -> Result<(), RunError>;
}
