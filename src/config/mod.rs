//! Configuration management for netconsole
//!
//! Settings that shape how the console behaves: transport port and
//! timeouts, and the speeds of the typing effect. Connection profiles are
//! deliberately not part of the configuration; they only ever live in
//! memory for the duration of a session.

pub mod loader;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure for netconsole
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transport configuration
    pub transport: TransportConfig,

    /// Typing effect configuration
    pub typing: TypingConfig,
}

impl Config {
    /// Load configuration from the default search paths, falling back to defaults
    pub fn load() -> Result<Self> {
        loader::ConfigLoader::load()
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        loader::ConfigLoader::load_from_path(path)
    }

    /// Write this configuration to `path`, TOML or JSON by extension
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        loader::ConfigLoader::new().save_to_path(self, path)
    }
}

/// Transport-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// SSH port on the device
    pub port: u16,

    /// Time allowed to open and authenticate a session
    pub connect_timeout_secs: u64,

    /// Time allowed for a single command to return
    pub command_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: 22,
            connect_timeout_secs: 10,
            command_timeout_secs: 10,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Typing effect configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Whether text is revealed progressively at all
    pub enabled: bool,

    /// Speed for the command about to be sent (50 ms per char)
    pub command_chars_per_second: f64,

    /// Speed for catalog explanations (30 ms per char)
    pub explanation_chars_per_second: f64,

    /// Speed for device output
    pub output_chars_per_second: f64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command_chars_per_second: 20.0,
            explanation_chars_per_second: 33.3,
            output_chars_per_second: 400.0,
        }
    }
}

impl TypingConfig {
    /// Effective speed: disabling the effect reveals text instantly
    pub fn speed(&self, chars_per_second: f64) -> f64 {
        if self.enabled {
            chars_per_second
        } else {
            f64::INFINITY
        }
    }
}
