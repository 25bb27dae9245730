//! Command Dispatch
//!
//! Executes a [`DispatchRequest`] against a [`Transport`]: open a session,
//! run the command, close the session. Every failure is folded into a
//! [`CommandResult`] so the caller always gets something to display.
//!
//! Dispatch is independent of the state machine that produced the request.
//! A front end can run it on a background task and feed the
//! [`DispatchCompletion`] back whenever it arrives. A [`Cancellation`]
//! stops a dispatch that has not reached the device yet; once the command
//! is on the wire it can only be abandoned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{CommandResult, ConnectionProfile};
use crate::security_audit;
use crate::transport::Transport;

/// Everything needed to send one command
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    /// Correlates the request with its completion
    pub id: Uuid,
    /// Command text as it will be sent
    pub command: String,
    /// Snapshot of the validated profile
    pub profile: ConnectionProfile,
    /// Time allowed to open the session
    pub connect_timeout: Duration,
    /// Time allowed for the command to return
    pub command_timeout: Duration,
}

impl DispatchRequest {
    pub fn new(
        command: impl Into<String>,
        profile: ConnectionProfile,
        connect_timeout: Duration,
        command_timeout: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            profile,
            connect_timeout,
            command_timeout,
        }
    }
}

/// Result of a dispatch, tagged with the request it answers
#[derive(Debug, Clone)]
pub struct DispatchCompletion {
    pub id: Uuid,
    pub result: CommandResult,
}

/// Shared flag that stops a dispatch
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the dispatch at its next step; idempotent
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Send the request's command through `transport`
pub async fn execute(transport: &dyn Transport, request: &DispatchRequest) -> DispatchCompletion {
    let started = Instant::now();
    execute_cancellable(transport, request, &Cancellation::new())
        .await
        .unwrap_or_else(|| DispatchCompletion {
            id: request.id,
            result: CommandResult::failure(
                &request.command,
                "dispatch cancelled",
                started.elapsed(),
            ),
        })
}

/// Like [`execute`], but gives up as soon as `cancel` fires
///
/// Returns `None` when cancelled. Cancelling while connecting guarantees the
/// command never reaches the device; cancelling while the command runs
/// stops waiting for its output. Any open session is closed either way.
pub async fn execute_cancellable(
    transport: &dyn Transport,
    request: &DispatchRequest,
    cancel: &Cancellation,
) -> Option<DispatchCompletion> {
    let started = Instant::now();
    let host = request.profile.host();
    let command = request.command.as_str();

    if cancel.is_cancelled() {
        info!("Dispatch {} cancelled before it started", request.id);
        return None;
    }

    security_audit::log_command_dispatch(host, command);
    info!(
        "Dispatching '{}' to {} via {}",
        command,
        host,
        transport.name()
    );

    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("Dispatch {} cancelled while connecting to {}", request.id, host);
            return None;
        }
        connected = transport.connect(&request.profile, request.connect_timeout) => connected,
    };

    let result = match connected {
        Err(e) => {
            warn!("Connection failed: {}", e);
            CommandResult::failure(command, e.to_string(), started.elapsed())
        }
        Ok(mut session) => {
            let outcome = if cancel.is_cancelled() {
                None
            } else {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    outcome = session.run(command, request.command_timeout) => Some(outcome),
                }
            };
            if let Err(e) = session.close().await {
                debug!("Closing session to {} failed: {}", host, e);
            }
            let Some(outcome) = outcome else {
                info!("Dispatch {} cancelled on {}", request.id, host);
                return None;
            };
            match outcome {
                Ok(output) => {
                    let result = CommandResult::success(command, output, started.elapsed());
                    info!(
                        "'{}' returned {} lines in {:?}",
                        command,
                        result.line_count(),
                        result.elapsed
                    );
                    result
                }
                Err(e) => {
                    warn!("Command failed: {}", e);
                    CommandResult::failure(command, e.to_string(), started.elapsed())
                }
            }
        }
    };

    Some(DispatchCompletion {
        id: request.id,
        result,
    })
}
