//! Command Result Model
//!
//! The outcome of dispatching one command. A result lives for a single
//! display cycle and is dropped once the operator acknowledges it; no
//! history of results is kept.

use std::time::Duration;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("ANSI escape pattern is valid")
});

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// The command text that was sent
    pub command: String,

    /// Device output (empty on failure)
    pub output: String,

    /// Whether the command ran to completion
    pub succeeded: bool,

    /// Reason for failure, never containing credentials
    pub error_detail: Option<String>,

    /// When the dispatch finished
    pub completed_at: DateTime<Local>,

    /// Wall-clock time spent in the transport
    pub elapsed: Duration,
}

impl CommandResult {
    /// Successful dispatch with device output
    pub fn success(command: impl Into<String>, output: impl AsRef<str>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            output: normalize_output(output.as_ref()),
            succeeded: true,
            error_detail: None,
            completed_at: Local::now(),
            elapsed,
        }
    }

    /// Failed dispatch
    pub fn failure(command: impl Into<String>, detail: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            output: String::new(),
            succeeded: false,
            error_detail: Some(detail.into()),
            completed_at: Local::now(),
            elapsed,
        }
    }

    /// Number of output lines
    pub fn line_count(&self) -> usize {
        self.output.lines().count()
    }
}

/// Strip terminal escape sequences and carriage returns from device output
pub fn normalize_output(raw: &str) -> String {
    ANSI_ESCAPE.replace_all(raw, "").replace('\r', "")
}
