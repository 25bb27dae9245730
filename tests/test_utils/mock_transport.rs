//! Mock Transport
//!
//! A scripted [`Transport`] that never touches the network. It records what
//! it was asked to do so tests can assert on connect/close counts and the
//! commands that reached the "device".

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use netconsole::models::ConnectionProfile;
use netconsole::transport::{ConnectError, RunError, Session, Transport};

#[derive(Debug, Default)]
struct MockStats {
    connects: AtomicUsize,
    closes: AtomicUsize,
    commands: Mutex<Vec<String>>,
    hosts: Mutex<Vec<String>>,
}

/// Scripted stand-in for a device
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    connect_error: Option<String>,
    run_error: Option<RunError>,
    responses: HashMap<String, String>,
    delay: Option<Duration>,
    connect_delay: Option<Duration>,
    stats: Arc<MockStats>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `command` with `output`; other commands get empty output
    pub fn respond(mut self, command: &str, output: &str) -> Self {
        self.responses
            .insert(command.to_string(), output.to_string());
        self
    }

    /// Refuse every connection with `reason`
    pub fn failing_connect(mut self, reason: &str) -> Self {
        self.connect_error = Some(reason.to_string());
        self
    }

    /// Connect fine, then fail every command
    pub fn failing_run(mut self, error: RunError) -> Self {
        self.run_error = Some(error);
        self
    }

    /// Take this long to answer each command
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Take this long to open each session
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    pub fn connect_count(&self) -> usize {
        self.stats.connects.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.stats.closes.load(Ordering::SeqCst)
    }

    /// Commands that reached a session, in order
    pub fn commands(&self) -> Vec<String> {
        self.stats.commands.lock().unwrap().clone()
    }

    /// Hosts connected to, in order
    pub fn hosts(&self) -> Vec<String> {
        self.stats.hosts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
        _timeout: Duration,
    ) -> Result<Box<dyn Session>, ConnectError> {
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        self.stats.connects.fetch_add(1, Ordering::SeqCst);
        self.stats
            .hosts
            .lock()
            .unwrap()
            .push(profile.host().to_string());

        if let Some(reason) = &self.connect_error {
            return Err(ConnectError::new(profile.host(), reason.clone()));
        }

        Ok(Box::new(MockSession {
            transport: self.clone(),
            open: true,
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

struct MockSession {
    transport: MockTransport,
    open: bool,
}

#[async_trait]
impl Session for MockSession {
    async fn run(&mut self, command: &str, timeout: Duration) -> Result<String, RunError> {
        if !self.open {
            return Err(RunError::Closed);
        }

        self.transport
            .stats
            .commands
            .lock()
            .unwrap()
            .push(command.to_string());

        if let Some(delay) = self.transport.delay {
            if tokio::time::timeout(timeout, tokio::time::sleep(delay))
                .await
                .is_err()
            {
                self.open = false;
                return Err(RunError::Timeout {
                    command: command.to_string(),
                    after: timeout,
                });
            }
        }

        if let Some(error) = &self.transport.run_error {
            return Err(error.clone());
        }

        Ok(self
            .transport
            .responses
            .get(command)
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), RunError> {
        self.open = false;
        self.transport.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
