//! Core data models for netconsole
//!
//! This module contains the domain entities the console works with:
//! the connection profile being edited and the result of one dispatch.

pub mod command_result;
pub mod profile;

// Re-exports for convenience
pub use command_result::{normalize_output, CommandResult};
pub use profile::{is_valid_host, ConnectionProfile, ProfileError, ProfileField, PASSWORD_MASK};
