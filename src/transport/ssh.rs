//! SSH Transport
//!
//! [`Transport`] implementation backed by libssh2. Each command runs on its
//! own exec channel, which is what network operating systems expect for
//! one-shot `show`/`clear` commands.
//!
//! libssh2 is blocking, so every call runs on tokio's blocking pool and is
//! wrapped in `tokio::time::timeout`. A session whose command timed out is
//! abandoned to the blocking thread and the handle is marked closed.

use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::{ConnectError, RunError, Session, Transport};
use crate::config::TransportConfig;
use crate::models::ConnectionProfile;
use crate::security_audit;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Opens password-authenticated SSH sessions
#[derive(Debug, Clone)]
pub struct SshTransport {
    port: u16,
}

impl SshTransport {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SSH_PORT)
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
        timeout: Duration,
    ) -> Result<Box<dyn Session>, ConnectError> {
        let host = profile.host().to_string();
        let username = profile.username().to_string();
        let password = Zeroizing::new(profile.password().to_string());
        let port = self.port;

        security_audit::log_connection_attempt(&host);

        let task_host = host.clone();
        let task = tokio::task::spawn_blocking(move || {
            open_session(&task_host, port, &username, &password, timeout)
        });

        let session = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                return Err(ConnectError::new(
                    &host,
                    format!("connection task failed: {}", join_error),
                ))
            }
            Err(_) => {
                return Err(ConnectError::new(
                    &host,
                    format!("timed out after {:?}", timeout),
                ))
            }
        };

        security_audit::log_session_start(&host);
        Ok(Box::new(SshSession {
            host,
            inner: Some(session),
            opened_at: Instant::now(),
        }))
    }

    fn name(&self) -> &str {
        "ssh"
    }
}

/// An authenticated SSH session
pub struct SshSession {
    host: String,
    inner: Option<ssh2::Session>,
    opened_at: Instant,
}

#[async_trait]
impl Session for SshSession {
    async fn run(&mut self, command: &str, timeout: Duration) -> Result<String, RunError> {
        let session = self.inner.take().ok_or(RunError::Closed)?;
        let owned_command = command.to_string();

        debug!("Running '{}' on {}", command, self.host);
        let task = tokio::task::spawn_blocking(move || {
            let result = exec_command(&session, &owned_command, timeout);
            (session, result)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok((session, result))) => {
                self.inner = Some(session);
                result
            }
            Ok(Err(join_error)) => Err(RunError::Failed {
                command: command.to_string(),
                reason: format!("command task failed: {}", join_error),
            }),
            Err(_) => {
                warn!(
                    "Command '{}' on {} timed out, abandoning session",
                    command, self.host
                );
                Err(RunError::Timeout {
                    command: command.to_string(),
                    after: timeout,
                })
            }
        }
    }

    async fn close(&mut self) -> Result<(), RunError> {
        let Some(session) = self.inner.take() else {
            return Ok(());
        };

        let result = tokio::task::spawn_blocking(move || {
            session.disconnect(None, "netconsole closing session", None)
        })
        .await;

        security_audit::log_session_end(self.opened_at.elapsed().as_secs());

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                info!("Disconnect from {} reported: {}", self.host, e.message());
                Ok(())
            }
            Err(join_error) => Err(RunError::Failed {
                command: "disconnect".to_string(),
                reason: join_error.to_string(),
            }),
        }
    }
}

fn timeout_millis(timeout: Duration) -> u32 {
    timeout.as_millis().min(u32::MAX as u128) as u32
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, ConnectError> {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    (bare, port)
        .to_socket_addrs()
        .map_err(|e| ConnectError::new(host, format!("cannot resolve host: {}", e)))?
        .next()
        .ok_or_else(|| ConnectError::new(host, "host resolved to no addresses"))
}

fn open_session(
    host: &str,
    port: u16,
    username: &str,
    password: &str,
    timeout: Duration,
) -> Result<ssh2::Session, ConnectError> {
    let addr = resolve(host, port)?;
    let tcp = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| ConnectError::new(host, e.to_string()))?;

    let mut session = ssh2::Session::new()
        .map_err(|e| ConnectError::new(host, format!("cannot create session: {}", e.message())))?;
    session.set_timeout(timeout_millis(timeout));
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| ConnectError::new(host, format!("handshake failed: {}", e.message())))?;
    session
        .userauth_password(username, password)
        .map_err(|e| ConnectError::new(host, format!("authentication failed: {}", e.message())))?;

    if !session.authenticated() {
        return Err(ConnectError::new(host, "authentication rejected"));
    }

    Ok(session)
}

fn exec_command(session: &ssh2::Session, command: &str, timeout: Duration) -> Result<String, RunError> {
    let failed = |reason: String| RunError::Failed {
        command: command.to_string(),
        reason,
    };
    let from_io = |e: std::io::Error| match e.kind() {
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => RunError::Timeout {
            command: command.to_string(),
            after: timeout,
        },
        _ => failed(e.to_string()),
    };

    session.set_timeout(timeout_millis(timeout));
    let mut channel = session
        .channel_session()
        .map_err(|e| failed(e.message().to_string()))?;
    // stderr arrives interleaved on the stdout stream
    channel
        .handle_extended_data(ssh2::ExtendedData::Merge)
        .map_err(|e| failed(e.message().to_string()))?;
    channel
        .exec(command)
        .map_err(|e| failed(e.message().to_string()))?;

    let mut raw = Vec::new();
    channel.read_to_end(&mut raw).map_err(from_io)?;

    channel
        .wait_close()
        .map_err(|e| failed(e.message().to_string()))?;
    let status = channel
        .exit_status()
        .map_err(|e| failed(e.message().to_string()))?;

    let output = String::from_utf8_lossy(&raw).into_owned();
    if status != 0 {
        debug!("'{}' exited with status {}", command, status);
    }

    Ok(output)
}
