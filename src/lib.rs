//! netconsole - a console for running vetted commands on network devices
//!
//! The operator describes a device with a [`ConnectionProfile`], picks a
//! command from the [`CommandCatalog`] (or types one), can ask what it does,
//! and sends it over a [`Transport`]. The result is shown until
//! acknowledged.
//!
//! ## Module Organization
//!
//! - [`console`] - the state machine, dispatch and view models
//! - [`catalog`] - the built-in command table with explanations
//! - [`models`] - connection profile and command result
//! - [`transport`] - transport/session traits and the SSH implementation
//! - [`typing`] - cosmetic typing effect
//! - [`config`] - configuration loading and validation
//! - [`security_audit`] - credential-free audit logging
//! - [`mod@error`] - error types and Result alias
//!
//! ## Quick Start
//!
//! ```no_run
//! use netconsole::console::{CommandConsole, Outcome, UserAction};
//! use netconsole::models::ProfileField;
//! use netconsole::transport::SshTransport;
//!
//! # async fn run() -> netconsole::Result<()> {
//! let mut console = CommandConsole::default();
//! console.handle(UserAction::Edit {
//!     field: ProfileField::Password,
//!     value: "secret".to_string(),
//! })?;
//! console.handle(UserAction::SubmitProfile)?;
//! console.handle(UserAction::Select("show ip interface brief".to_string()))?;
//! if let Outcome::Dispatch(_) = console.handle(UserAction::Send)? {
//!     console.run_pending(&SshTransport::default()).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Security
//!
//! The password is held in a zeroizing buffer, masked in every view and
//! `Debug` output, and never written to logs or error messages.

pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod security_audit;
pub mod transport;
pub mod typing;

// Re-exports for core functionality
pub use catalog::CommandCatalog;
pub use config::Config;
pub use console::{CommandConsole, ConsoleState, Screen, UserAction};
pub use error::{Error, Result};
pub use models::{CommandResult, ConnectionProfile};
pub use transport::{Session, SshTransport, Transport};
pub use typing::TypingEffect;

/// The current version of netconsole from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
