//! Main application structure
//!
//! `ConsoleApp` implements `eframe::App` on top of the toolkit-independent
//! [`CommandConsole`]. Each frame it:
//!
//! - drains finished dispatches from the background loop
//! - asks the console for a [`Screen`] and draws it
//! - turns clicks and key presses into [`UserAction`]s
//!
//! ## UI Layout
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Heading (screen title)                  │
//! ├─────────────────────────────────────────┤
//! │ Screen body                             │
//! │ - profile editor / command menu         │
//! │ - command prompt / result panel         │
//! ├─────────────────────────────────────────┤
//! │ Notice line                             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - `mod.rs` - app struct, eframe::App impl, screen rendering
//! - `async_ops.rs` - background dispatch loop

mod async_ops;

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use arboard::Clipboard;
use eframe::egui;
use netconsole::config::{Config, TypingConfig};
use netconsole::console::{
    CommandConsole, DispatchCompletion, DispatchRequest, FieldView, MenuSection, Notice, Outcome,
    ResultPanel, Screen, UserAction,
};
use netconsole::error::{Error, Result};
use netconsole::models::{ProfileField, PASSWORD_MASK};
use netconsole::transport::{SshTransport, Transport};
use netconsole::typing::TypingEffect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);
const OK_COLOR: egui::Color32 = egui::Color32::from_rgb(110, 200, 110);
const EXPLANATION_COLOR: egui::Color32 = egui::Color32::from_rgb(150, 180, 230);

/// Request sent from the UI to the background loop
#[derive(Debug)]
pub(crate) enum AsyncRequest {
    /// Run a command on the device
    Dispatch(DispatchRequest),
    /// Stop the dispatch with this id if it is still running
    Cancel(Uuid),
}

/// Result sent from the background loop to the UI
#[derive(Debug)]
pub(crate) enum AsyncResult {
    /// A dispatch finished, successfully or not
    Completed(DispatchCompletion),
}

/// What the operator asked for during this frame
enum Intent {
    Action(UserAction),
    SubmitDrafts,
    CopyOutput(String),
}

/// Editor buffers, loaded from the profile each time the editor opens
#[derive(Default)]
struct ProfileDraft {
    name: String,
    host: String,
    username: String,
    password: Zeroizing<String>,
    password_set: bool,
    loaded: bool,
}

impl ProfileDraft {
    fn load(&mut self, fields: &[FieldView]) {
        for view in fields {
            match view.field {
                ProfileField::Name => self.name = view.value.clone(),
                ProfileField::Host => self.host = view.value.clone(),
                ProfileField::Username => self.username = view.value.clone(),
                ProfileField::Password => self.password_set = view.value == PASSWORD_MASK,
            }
        }
        self.password = Zeroizing::new(String::new());
        self.loaded = true;
    }

    fn buffer(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Host => &mut self.host,
            ProfileField::Username => &mut self.username,
            ProfileField::Password => &mut *self.password,
        }
    }

    /// Edits to apply before submitting; a blank password keeps the current one
    fn edits(&self) -> Vec<UserAction> {
        let mut edits = vec![
            UserAction::Edit {
                field: ProfileField::Name,
                value: self.name.clone(),
            },
            UserAction::Edit {
                field: ProfileField::Host,
                value: self.host.clone(),
            },
            UserAction::Edit {
                field: ProfileField::Username,
                value: self.username.clone(),
            },
        ];
        if !self.password.is_empty() || !self.password_set {
            edits.push(UserAction::Edit {
                field: ProfileField::Password,
                value: (*self.password).clone(),
            });
        }
        edits
    }
}

/// Progressive reveal of whichever text is currently animated
struct Typewriter {
    text: Option<String>,
    effect: TypingEffect,
}

impl Typewriter {
    fn new() -> Self {
        Self {
            text: None,
            effect: TypingEffect::new(f64::INFINITY),
        }
    }

    /// Start over with the next text shown
    fn restart(&mut self) {
        self.text = None;
    }

    /// Restarts the effect whenever the text changes
    fn show(&mut self, text: &str, chars_per_second: f64, cursor: bool) -> String {
        if self.text.as_deref() != Some(text) {
            self.text = Some(text.to_string());
            self.effect = TypingEffect::new(chars_per_second);
        }
        let now = Instant::now();
        if cursor {
            self.effect.frame(text, now, SystemTime::now())
        } else {
            self.effect.visible(text, now)
        }
    }

    fn is_animating(&self) -> bool {
        match &self.text {
            Some(text) => !self.effect.is_complete(text, Instant::now()),
            None => false,
        }
    }
}

/// The netconsole GUI
pub struct ConsoleApp {
    console: CommandConsole,
    typing: TypingConfig,
    draft: ProfileDraft,
    manual_entry: String,
    typewriter: Typewriter,
    /// Tokio runtime for dispatches
    /// Note: kept alive for the background loop even though it is not accessed
    #[allow(dead_code)]
    runtime: tokio::runtime::Runtime,
    async_tx: mpsc::UnboundedSender<AsyncRequest>,
    async_rx: mpsc::UnboundedReceiver<AsyncResult>,
    status: Option<String>,
}

impl ConsoleApp {
    /// Create the app with the SSH transport described by `config`
    pub fn new(config: &Config, repaint: egui::Context) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(SshTransport::from_config(&config.transport));
        Self::with_transport(config, transport, repaint)
    }

    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn Transport>,
        repaint: egui::Context,
    ) -> Result<Self> {
        info!("Initializing netconsole application");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("netconsole-dispatch")
            .enable_all()
            .build()
            .or_else(|e| {
                warn!(
                    "Failed to create multi-threaded runtime: {}, trying single-threaded",
                    e
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;

        let (request_tx, mut request_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        runtime.spawn(async move {
            async_ops::dispatch_loop(&mut request_rx, result_tx, transport, repaint).await;
        });

        Ok(Self {
            console: CommandConsole::from_config(config),
            typing: config.typing.clone(),
            draft: ProfileDraft::default(),
            manual_entry: String::new(),
            typewriter: Typewriter::new(),
            runtime,
            async_tx: request_tx,
            async_rx: result_rx,
            status: None,
        })
    }

    /// Apply an action, forwarding dispatches and aborts to the background loop
    fn apply(&mut self, action: UserAction) {
        let before = self.console.state().name();
        let outcome = self.console.handle(action);
        if self.console.state().name() != before {
            self.typewriter.restart();
        }

        match outcome {
            Ok(Outcome::Updated) => {}
            Ok(Outcome::Dispatch(request)) => self.send_to_worker(AsyncRequest::Dispatch(request)),
            Ok(Outcome::Abort(id)) => self.send_to_worker(AsyncRequest::Cancel(id)),
            // Validation failures are already surfaced as a console notice
            Err(Error::InvalidTransition { state, action }) => {
                debug!("Ignoring '{}' while {}", action, state);
            }
            Err(e) => debug!("Action rejected: {}", e),
        }
    }

    fn send_to_worker(&mut self, request: AsyncRequest) {
        if self.async_tx.send(request).is_err() {
            warn!("Dispatch loop is gone");
            self.status = Some("Background worker stopped; restart netconsole".to_string());
        }
    }

    fn submit_drafts(&mut self) {
        for edit in self.draft.edits() {
            self.apply(edit);
        }
        self.apply(UserAction::SubmitProfile);
        if !matches!(self.console.screen(), Screen::ProfileEditor { .. }) {
            self.draft.password = Zeroizing::new(String::new());
        }
    }

    fn poll_async_results(&mut self) {
        while let Ok(result) = self.async_rx.try_recv() {
            match result {
                AsyncResult::Completed(completion) => match self.console.complete(completion) {
                    Ok(()) => self.typewriter.restart(),
                    Err(e) => debug!("{}", e),
                },
            }
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.status = Some("Output copied to clipboard".to_string()),
            Err(e) => {
                warn!("Clipboard unavailable: {}", e);
                self.status = Some(format!("Could not copy output: {}", e));
            }
        }
    }

    fn render_profile_editor(
        &mut self,
        ui: &mut egui::Ui,
        fields: &[FieldView],
        intents: &mut Vec<Intent>,
    ) {
        if !self.draft.loaded {
            self.draft.load(fields);
        }

        let password_set = self.draft.password_set;
        let mut submit = false;
        egui::Grid::new("profile_editor")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for view in fields {
                    ui.label(view.label);
                    let mut edit = egui::TextEdit::singleline(self.draft.buffer(view.field))
                        .desired_width(280.0);
                    if view.secret {
                        let hint = if password_set {
                            "unchanged"
                        } else {
                            "required"
                        };
                        edit = edit.password(true).hint_text(hint);
                    }
                    let response = ui.add(edit);
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        if ui.button("Connect profile").clicked() || submit {
            intents.push(Intent::SubmitDrafts);
        }
    }

    fn render_menu(
        &mut self,
        ui: &mut egui::Ui,
        profile: &[(&'static str, String)],
        sections: &[MenuSection],
        intents: &mut Vec<Intent>,
    ) {
        ui.horizontal_wrapped(|ui| {
            for (label, value) in profile {
                ui.label(egui::RichText::new(format!("{}: {}", label, value)).weak());
            }
            if ui.small_button("Edit profile").clicked() {
                intents.push(Intent::Action(UserAction::EditProfile));
            }
        });
        ui.separator();

        for section in sections {
            ui.label(egui::RichText::new(section.title).strong());
            ui.horizontal_wrapped(|ui| {
                for item in &section.items {
                    if ui.button(item.label).on_hover_text(item.command).clicked() {
                        intents.push(Intent::Action(UserAction::Select(item.command.to_string())));
                    }
                }
            });
            ui.add_space(6.0);
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Manual entry:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.manual_entry)
                    .hint_text("show version")
                    .desired_width(320.0),
            );
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Enter").clicked() || entered {
                let text = std::mem::take(&mut self.manual_entry);
                intents.push(Intent::Action(UserAction::ManualEntry(text)));
            }
        });
    }

    fn render_command_prompt(
        &mut self,
        ui: &mut egui::Ui,
        command: &str,
        explanation_available: bool,
        intents: &mut Vec<Intent>,
    ) {
        let speed = self.typing.speed(self.typing.command_chars_per_second);
        let shown = self.typewriter.show(command, speed, true);
        ui.label(egui::RichText::new(format!("> {}", shown)).monospace().size(16.0));
        if !explanation_available {
            ui.label(egui::RichText::new("Not in the catalog").weak());
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("What is this?").clicked() {
                intents.push(Intent::Action(UserAction::Explain));
            }
            if ui.button("Send").clicked() {
                intents.push(Intent::Action(UserAction::Send));
            }
            if ui.button("Cancel").clicked() {
                intents.push(Intent::Action(UserAction::Cancel));
            }
        });
    }

    fn render_dispatching(
        &mut self,
        ui: &mut egui::Ui,
        command: &str,
        host: &str,
        intents: &mut Vec<Intent>,
    ) {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(format!("Sending '{}' to {}", command, host));
        });
        ui.add_space(8.0);
        if ui.button("Cancel").clicked() {
            intents.push(Intent::Action(UserAction::Cancel));
        }
    }

    fn render_result(&mut self, ui: &mut egui::Ui, panel: &ResultPanel, intents: &mut Vec<Intent>) {
        let color = if panel.succeeded { OK_COLOR } else { ERROR_COLOR };
        ui.colored_label(color, panel.title());
        ui.label(
            egui::RichText::new(format!(
                "completed {} in {:.1}s",
                panel.completed_at,
                panel.elapsed.as_secs_f64()
            ))
            .weak(),
        );

        let speed = self.typing.speed(self.typing.output_chars_per_second);
        let shown = self.typewriter.show(&panel.body, speed, false);
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 48.0).max(80.0))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(egui::RichText::new(shown).monospace());
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("OK").clicked() {
                intents.push(Intent::Action(UserAction::Acknowledge));
            }
            if ui.button("Copy output").clicked() {
                intents.push(Intent::CopyOutput(panel.body.clone()));
            }
        });
    }

    fn render_notice(&mut self, ui: &mut egui::Ui, notice: &Notice) {
        match notice {
            Notice::Explanation { command, text } => {
                ui.label(egui::RichText::new(command).strong());
                match text {
                    Some(text) => {
                        let speed = self.typing.speed(self.typing.explanation_chars_per_second);
                        let shown = self.typewriter.show(text, speed, false);
                        ui.colored_label(EXPLANATION_COLOR, shown);
                    }
                    None => {
                        ui.label("No explanation is available for this command.");
                    }
                }
            }
            Notice::Error(message) => {
                ui.colored_label(ERROR_COLOR, message);
            }
            Notice::Info(message) => {
                ui.label(message);
            }
        }
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        let screen = self.console.screen();
        if !matches!(screen, Screen::ProfileEditor { .. }) {
            self.draft.loaded = false;
        }

        let mut intents = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(screen.title());
            ui.separator();

            match &screen {
                Screen::ProfileEditor { fields, notice } => {
                    self.render_profile_editor(ui, fields, &mut intents);
                    if let Some(notice) = notice {
                        ui.separator();
                        self.render_notice(ui, notice);
                    }
                }
                Screen::Menu {
                    profile,
                    sections,
                    notice,
                } => {
                    self.render_menu(ui, profile, sections, &mut intents);
                    if let Some(notice) = notice {
                        ui.separator();
                        self.render_notice(ui, notice);
                    }
                }
                Screen::CommandPrompt {
                    command,
                    explanation_available,
                } => {
                    self.render_command_prompt(ui, command, *explanation_available, &mut intents);
                }
                Screen::Dispatching { command, host } => {
                    self.render_dispatching(ui, command, host, &mut intents);
                }
                Screen::Result(panel) => {
                    self.render_result(ui, panel, &mut intents);
                }
            }

            if let Some(status) = &self.status {
                ui.separator();
                ui.label(egui::RichText::new(status).weak());
            }
        });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            match screen {
                Screen::CommandPrompt { .. } | Screen::Dispatching { .. } => {
                    intents.push(Intent::Action(UserAction::Cancel));
                }
                Screen::Result(_) => intents.push(Intent::Action(UserAction::Acknowledge)),
                _ => {}
            }
        }

        for intent in intents {
            self.status = None;
            match intent {
                Intent::Action(action) => self.apply(action),
                Intent::SubmitDrafts => self.submit_drafts(),
                Intent::CopyOutput(text) => self.copy_to_clipboard(&text),
            }
        }

        if self.typewriter.is_animating() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else if matches!(self.console.screen(), Screen::CommandPrompt { .. }) {
            // Cursor blink
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
