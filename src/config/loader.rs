//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with support for multiple formats and fallback mechanisms.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Config;
use crate::error::{Error, Result};
use crate::security_audit;

/// Directory name used under every search root
const APP_DIR: &str = "netconsole";

/// Longest timeout accepted for any transport operation
const MAX_TIMEOUT_SECS: u64 = 600;

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::new().load_with_options(LoadOptions::default())
    }

    /// Load and validate a specific configuration file
    pub fn load_from_path(path: &Path) -> Result<Config> {
        let loader = Self::new();
        let config = loader.load_config_file(path, ConfigFormat::from_path(path))?;
        loader.validate_config(&config)?;
        security_audit::log_config_event(false, Some(&format!("path={}", path.display())));
        Ok(config)
    }

    /// Load configuration from the search paths with custom options
    pub fn load_with_options(self, options: LoadOptions) -> Result<Config> {
        // Try to find and load existing configuration
        if let Some((path, config)) = self.find_and_load_config() {
            if options.validate {
                self.validate_config(&config)?;
            }
            security_audit::log_config_event(false, Some(&format!("path={}", path.display())));
            return Ok(config);
        }

        // No configuration found, use defaults if requested
        if options.create_default {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Save configuration to a specific path, format chosen by extension
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        debug!("Saved {} config to {}", format.name(), path.display());
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Option<(PathBuf, Config)> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = self.get_config_path_for_format(path, *format);

                if config_path.exists() {
                    match self.load_config_file(&config_path, *format) {
                        Ok(config) => return Some((config_path, config)),
                        Err(e) => {
                            // Log warning but continue searching
                            warn!("Failed to load config from {}: {}", config_path.display(), e);
                            security_audit::log_config_event(true, Some(&e.to_string()));
                            continue;
                        }
                    }
                }
            }
        }

        None
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get configuration file path for a specific format
    fn get_config_path_for_format(&self, base_path: &Path, format: ConfigFormat) -> PathBuf {
        base_path.join("config").with_extension(format.extension())
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_DIR));
        }

        // XDG config home fallback (for platforms that might set it)
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join(APP_DIR));
        }

        // Home directory fallbacks
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(format!(".{}", APP_DIR)));
            paths.push(home.join(".config").join(APP_DIR));
        }

        // Current working directory
        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(format!(".{}", APP_DIR)));
        }

        paths
    }

    /// Validate configuration
    pub fn validate_config(&self, config: &Config) -> Result<()> {
        // Transport validation
        if config.transport.port == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "transport.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        for (field, secs) in [
            ("transport.connect_timeout_secs", config.transport.connect_timeout_secs),
            ("transport.command_timeout_secs", config.transport.command_timeout_secs),
        ] {
            if secs == 0 {
                return Err(Error::ConfigValidationFailed {
                    field: field.to_string(),
                    reason: "Timeout must be greater than 0".to_string(),
                });
            }
            if secs > MAX_TIMEOUT_SECS {
                return Err(Error::ConfigValidationFailed {
                    field: field.to_string(),
                    reason: format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECS),
                });
            }
        }

        // Typing validation
        for (field, speed) in [
            ("typing.command_chars_per_second", config.typing.command_chars_per_second),
            ("typing.explanation_chars_per_second", config.typing.explanation_chars_per_second),
            ("typing.output_chars_per_second", config.typing.output_chars_per_second),
        ] {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(Error::ConfigValidationFailed {
                    field: field.to_string(),
                    reason: "Speed must be a positive number".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
