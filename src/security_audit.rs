//! Security Audit Logging
//!
//! This module provides security audit logging for important events.
//!
//! ## Security Policy
//!
//! - **NEVER** log passwords or any other credential
//! - Only log security-relevant events with non-sensitive metadata
//! - Use INFO level for normal events, WARN for failures
//! - Hostnames are sanitized before they reach the log
//!
//! ## Events Logged
//!
//! - Connection attempts (host only, no credentials)
//! - Session start/end
//! - Profile submission (outcome only)
//! - Command dispatch (command text and host)
//! - Configuration loads/errors

use tracing::{info, warn};

/// Security audit event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    /// Connection to a device initiated
    ConnectionAttempt,
    /// Session to a device established
    SessionStart,
    /// Session to a device ended
    SessionEnd,
    /// Connection profile submitted for validation
    ProfileSubmitted,
    /// Command sent to a device
    CommandDispatched,
    /// Configuration file loaded
    ConfigLoaded,
    /// Configuration file error
    ConfigError,
}

impl SecurityEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> &'static str {
        match self {
            SecurityEvent::ConnectionAttempt => "Device connection initiated",
            SecurityEvent::SessionStart => "Device session established",
            SecurityEvent::SessionEnd => "Device session terminated",
            SecurityEvent::ProfileSubmitted => "Connection profile submitted",
            SecurityEvent::CommandDispatched => "Command dispatched to device",
            SecurityEvent::ConfigLoaded => "Configuration loaded successfully",
            SecurityEvent::ConfigError => "Configuration loading error",
        }
    }

    /// Whether the event reports a failure and should be logged as a warning
    pub fn is_failure(&self) -> bool {
        matches!(self, SecurityEvent::ConfigError)
    }
}

/// Log a security audit event
///
/// ## Security Note
///
/// Never pass sensitive data (passwords, keys, etc.) as metadata.
/// Only include non-sensitive information like hostnames, event types, counts, etc.
///
/// # Examples
///
/// ```
/// use netconsole::security_audit::{log_security_event, SecurityEvent};
///
/// // Good: Logs event with non-sensitive metadata
/// log_security_event(SecurityEvent::ConnectionAttempt, Some("host=10.0.0.1"));
///
/// // BAD: Never do this!
/// // log_security_event(SecurityEvent::ConnectionAttempt, Some("password=secret123"));
/// ```
pub fn log_security_event(event: SecurityEvent, metadata: Option<&str>) {
    let event_desc = event.description();

    let log_message = if let Some(meta) = metadata {
        format!("SECURITY AUDIT: {} | {}", event_desc, meta)
    } else {
        format!("SECURITY AUDIT: {}", event_desc)
    };

    if event.is_failure() {
        warn!("{}", log_message);
    } else {
        info!("{}", log_message);
    }
}

/// Log connection attempt (host only, no credentials)
pub fn log_connection_attempt(host: &str) {
    log_security_event(
        SecurityEvent::ConnectionAttempt,
        Some(&format!("host={}", sanitize_hostname(host))),
    );
}

/// Log session start
pub fn log_session_start(host: &str) {
    log_security_event(
        SecurityEvent::SessionStart,
        Some(&format!("host={}", sanitize_hostname(host))),
    );
}

/// Log session end
pub fn log_session_end(duration_secs: u64) {
    log_security_event(
        SecurityEvent::SessionEnd,
        Some(&format!("duration={}s", duration_secs)),
    );
}

/// Log profile submission outcome (never the field values)
pub fn log_profile_submitted(accepted: bool) {
    log_security_event(
        SecurityEvent::ProfileSubmitted,
        Some(if accepted { "result=accepted" } else { "result=rejected" }),
    );
}

/// Log a command being sent to a device
pub fn log_command_dispatch(host: &str, command: &str) {
    log_security_event(
        SecurityEvent::CommandDispatched,
        Some(&format!(
            "host={} command={}",
            sanitize_hostname(host),
            sanitize_command(command)
        )),
    );
}

/// Log configuration events
pub fn log_config_event(is_error: bool, details: Option<&str>) {
    let event = if is_error {
        SecurityEvent::ConfigError
    } else {
        SecurityEvent::ConfigLoaded
    };
    log_security_event(event, details);
}

/// Sanitize hostname to prevent log injection
fn sanitize_hostname(host: &str) -> String {
    // Remove any characters that could be used for log injection
    host.chars()
        .filter(|c| c.is_alphanumeric() || matches!(*c, '.' | '-' | ':' | '[' | ']'))
        .take(100) // Limit length
        .collect()
}

/// Keep command text on a single log line
fn sanitize_command(command: &str) -> String {
    command
        .chars()
        .filter(|c| !c.is_control())
        .take(200)
        .collect()
}
