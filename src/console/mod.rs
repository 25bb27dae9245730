//! Command Console
//!
//! The state machine at the heart of netconsole. It owns the connection
//! profile and walks the operator from editing that profile, through picking
//! a command, to seeing what the device said:
//!
//! ```text
//! EditingProfile ──submit ok──▶ Idle ──select / manual entry──▶ AwaitingExplanationOrDispatch
//!       ▲                       ▲  │                               │        │        │
//!       └──────edit profile─────┘  │◀────────explain / cancel──────┘        │ send   │
//!                                  │                                        ▼        │
//!                                  │◀──────cancel────────────────────── Dispatching  │
//!                                  │                                        │ complete
//!                                  │◀──────acknowledge──────────────── ShowingResult
//! ```
//!
//! The console never renders and never performs I/O itself. Front ends read
//! a [`Screen`] from [`CommandConsole::screen`], feed [`UserAction`]s into
//! [`CommandConsole::handle`] and, when handed a [`DispatchRequest`], run it
//! through [`dispatch::execute`] and return the completion with
//! [`CommandConsole::complete`]. Cancelling an in-flight command yields
//! [`Outcome::Abort`], which the front end must pass on to the running
//! dispatch's [`Cancellation`].

pub mod dispatch;
pub mod view;

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::CommandCatalog;
use crate::config::{Config, TransportConfig};
use crate::error::{Error, Result};
use crate::models::{CommandResult, ConnectionProfile, ProfileField};
use crate::security_audit;
use crate::transport::Transport;

pub use dispatch::{Cancellation, DispatchCompletion, DispatchRequest};
pub use view::{FieldView, MenuItem, MenuSection, ResultPanel, Screen};

/// Where the console is in its interaction cycle
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleState {
    /// Profile fields are being edited
    EditingProfile,
    /// Validated profile, menu shown
    Idle,
    /// A command is chosen; explain it, send it, or cancel
    AwaitingExplanationOrDispatch { command: String },
    /// A command is in flight
    Dispatching { command: String, id: Uuid },
    /// The outcome of the last dispatch is on screen
    ShowingResult { result: CommandResult },
}

impl ConsoleState {
    /// Phrase used in transition errors
    pub fn name(&self) -> &'static str {
        match self {
            ConsoleState::EditingProfile => "editing the profile",
            ConsoleState::Idle => "idle",
            ConsoleState::AwaitingExplanationOrDispatch { .. } => "awaiting explanation or dispatch",
            ConsoleState::Dispatching { .. } => "dispatching",
            ConsoleState::ShowingResult { .. } => "showing a result",
        }
    }
}

/// Discrete user input accepted by the console
#[derive(Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Overwrite one profile field
    Edit { field: ProfileField, value: String },
    /// Validate the profile and move on to the menu
    SubmitProfile,
    /// Go back to editing the profile
    EditProfile,
    /// Pick a command from the menu
    Select(String),
    /// Type a command by hand
    ManualEntry(String),
    /// Show what the chosen command does
    Explain,
    /// Send the chosen command
    Send,
    /// Abandon the chosen or in-flight command
    Cancel,
    /// Dismiss the result panel
    Acknowledge,
}

impl UserAction {
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::Edit { .. } => "edit",
            UserAction::SubmitProfile => "submit profile",
            UserAction::EditProfile => "edit profile",
            UserAction::Select(_) => "select",
            UserAction::ManualEntry(_) => "manual entry",
            UserAction::Explain => "explain",
            UserAction::Send => "send",
            UserAction::Cancel => "cancel",
            UserAction::Acknowledge => "acknowledge",
        }
    }
}

impl fmt::Debug for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserAction::Edit { field, value } => {
                let shown = if field.is_secret() { "<redacted>" } else { value.as_str() };
                f.debug_struct("Edit")
                    .field("field", field)
                    .field("value", &shown)
                    .finish()
            }
            UserAction::Select(command) => f.debug_tuple("Select").field(command).finish(),
            UserAction::ManualEntry(text) => f.debug_tuple("ManualEntry").field(text).finish(),
            UserAction::SubmitProfile => f.write_str("SubmitProfile"),
            UserAction::EditProfile => f.write_str("EditProfile"),
            UserAction::Explain => f.write_str("Explain"),
            UserAction::Send => f.write_str("Send"),
            UserAction::Cancel => f.write_str("Cancel"),
            UserAction::Acknowledge => f.write_str("Acknowledge"),
        }
    }
}

/// Transient message shown alongside the profile editor or the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Catalog explanation; `None` for commands that are not catalogued
    Explanation {
        command: String,
        text: Option<&'static str>,
    },
    /// Something went wrong and the operator should act
    Error(String),
    /// Informational message
    Info(String),
}

/// What the caller has to do after an action
#[derive(Debug)]
pub enum Outcome {
    /// Nothing beyond re-rendering
    Updated,
    /// Run this request and hand the completion back
    Dispatch(DispatchRequest),
    /// Stop the in-flight dispatch with this id; its completion will be
    /// rejected as stale
    Abort(Uuid),
}

/// Timeouts applied to every dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&TransportConfig::default())
    }
}

impl From<&TransportConfig> for DispatchSettings {
    fn from(config: &TransportConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            command_timeout: config.command_timeout(),
        }
    }
}

/// The console state machine
#[derive(Debug)]
pub struct CommandConsole {
    state: ConsoleState,
    profile: ConnectionProfile,
    catalog: CommandCatalog,
    settings: DispatchSettings,
    notice: Option<Notice>,
    pending: Option<DispatchRequest>,
}

impl CommandConsole {
    /// Console with the placeholder profile, editing it
    pub fn new(catalog: CommandCatalog, settings: DispatchSettings) -> Self {
        Self::with_profile(ConnectionProfile::placeholder(), catalog, settings)
    }

    /// Console starting from a given (not yet validated) profile
    pub fn with_profile(
        profile: ConnectionProfile,
        catalog: CommandCatalog,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            state: ConsoleState::EditingProfile,
            profile,
            catalog,
            settings,
            notice: None,
            pending: None,
        }
    }

    /// Console using the built-in catalog and configured timeouts
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CommandCatalog::built_in(),
            DispatchSettings::from(&config.transport),
        )
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Request waiting for its completion, if any
    pub fn pending(&self) -> Option<&DispatchRequest> {
        self.pending.as_ref()
    }

    pub fn is_dispatching(&self) -> bool {
        matches!(self.state, ConsoleState::Dispatching { .. })
    }

    /// Apply one user action
    ///
    /// # Errors
    /// - [`Error::InvalidTransition`] if the action is not accepted in the
    ///   current state; the console is left untouched
    /// - [`Error::Profile`] if the profile fails validation on submit; the
    ///   console stays in `EditingProfile` with an error notice
    /// - [`Error::EmptyCommand`] for blank manual entry; the console stays idle
    pub fn handle(&mut self, action: UserAction) -> Result<Outcome> {
        debug!("Console {} <- {:?}", self.state.name(), action);

        match (&self.state, action) {
            (ConsoleState::EditingProfile, UserAction::Edit { field, value }) => {
                self.profile.set(field, value);
                self.notice = None;
                Ok(Outcome::Updated)
            }
            (ConsoleState::EditingProfile, UserAction::SubmitProfile) => {
                match self.profile.validate() {
                    Ok(()) => {
                        security_audit::log_profile_submitted(true);
                        info!("Profile '{}' accepted", self.profile.name());
                        self.notice = None;
                        self.transition(ConsoleState::Idle);
                        Ok(Outcome::Updated)
                    }
                    Err(e) => {
                        security_audit::log_profile_submitted(false);
                        self.notice = Some(Notice::Error(e.to_string()));
                        Err(e.into())
                    }
                }
            }
            (ConsoleState::Idle, UserAction::EditProfile) => {
                self.notice = None;
                self.transition(ConsoleState::EditingProfile);
                Ok(Outcome::Updated)
            }
            (ConsoleState::Idle, UserAction::Select(command))
            | (ConsoleState::Idle, UserAction::ManualEntry(command)) => {
                let command = command.trim();
                if command.is_empty() {
                    self.notice = Some(Notice::Error(Error::EmptyCommand.to_string()));
                    return Err(Error::EmptyCommand);
                }
                self.notice = None;
                self.transition(ConsoleState::AwaitingExplanationOrDispatch {
                    command: command.to_string(),
                });
                Ok(Outcome::Updated)
            }
            (ConsoleState::AwaitingExplanationOrDispatch { command }, UserAction::Explain) => {
                let command = command.clone();
                let text = self.catalog.lookup(&command);
                if text.is_none() {
                    debug!("'{}' is not catalogued", command);
                }
                self.notice = Some(Notice::Explanation { command, text });
                self.transition(ConsoleState::Idle);
                Ok(Outcome::Updated)
            }
            (ConsoleState::AwaitingExplanationOrDispatch { command }, UserAction::Send) => {
                let command = command.clone();
                if let Err(e) = self.profile.validate() {
                    self.notice = Some(Notice::Error(e.to_string()));
                    self.transition(ConsoleState::EditingProfile);
                    return Err(e.into());
                }

                let request = DispatchRequest::new(
                    command.clone(),
                    self.profile.clone(),
                    self.settings.connect_timeout,
                    self.settings.command_timeout,
                );
                self.notice = None;
                self.transition(ConsoleState::Dispatching {
                    command,
                    id: request.id,
                });
                self.pending = Some(request.clone());
                Ok(Outcome::Dispatch(request))
            }
            (ConsoleState::AwaitingExplanationOrDispatch { .. }, UserAction::Cancel) => {
                self.transition(ConsoleState::Idle);
                Ok(Outcome::Updated)
            }
            (ConsoleState::Dispatching { command, id }, UserAction::Cancel) => {
                let id = *id;
                let message = format!("Dispatch of '{}' cancelled", command);
                info!("{}", message);
                self.pending = None;
                self.notice = Some(Notice::Info(message));
                self.transition(ConsoleState::Idle);
                Ok(Outcome::Abort(id))
            }
            (ConsoleState::ShowingResult { .. }, UserAction::Acknowledge) => {
                self.transition(ConsoleState::Idle);
                Ok(Outcome::Updated)
            }
            (state, action) => Err(Error::InvalidTransition {
                state: state.name(),
                action: action.name(),
            }),
        }
    }

    /// Feed back the completion of the in-flight dispatch
    ///
    /// # Errors
    /// [`Error::StaleDispatch`] if the completion does not belong to the
    /// dispatch currently in flight (for example after a cancel)
    pub fn complete(&mut self, completion: DispatchCompletion) -> Result<()> {
        match &self.state {
            ConsoleState::Dispatching { id, .. } if *id == completion.id => {
                self.pending = None;
                if let Some(detail) = &completion.result.error_detail {
                    info!("Dispatch failed: {}", detail);
                }
                self.transition(ConsoleState::ShowingResult {
                    result: completion.result,
                });
                Ok(())
            }
            _ => {
                debug!("Dropping completion for dispatch {}", completion.id);
                Err(Error::StaleDispatch { id: completion.id })
            }
        }
    }

    /// Execute the pending request on `transport` and complete it
    ///
    /// Convenience for front ends that can afford to await the dispatch
    /// inline.
    pub async fn run_pending(&mut self, transport: &dyn Transport) -> Result<()> {
        let request = self.pending.clone().ok_or(Error::NoPendingDispatch)?;
        let completion = dispatch::execute(transport, &request).await;
        self.complete(completion)
    }

    /// View model for the current state
    pub fn screen(&self) -> Screen {
        view::build(self)
    }

    fn transition(&mut self, next: ConsoleState) {
        debug!("Console {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}

impl Default for CommandConsole {
    fn default() -> Self {
        Self::new(CommandCatalog::built_in(), DispatchSettings::default())
    }
}
