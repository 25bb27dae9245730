//! Console view models
//!
//! Toolkit-independent description of what should be on screen. Front ends
//! render a [`Screen`] and never reach into the console's internals. The
//! password only ever appears here in masked form.

use std::time::Duration;

use crate::catalog::CommandGroup;
use crate::models::ProfileField;

use super::{CommandConsole, ConsoleState, Notice};

/// One row of the profile editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: ProfileField,
    pub label: &'static str,
    /// Current value; masked for secret fields
    pub value: String,
    pub secret: bool,
}

/// A menu button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub command: &'static str,
    pub label: &'static str,
}

/// Menu buttons sharing a leading verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
}

/// Outcome of a dispatch, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanel {
    pub command: String,
    pub succeeded: bool,
    /// Device output, or the failure detail when the dispatch failed
    pub body: String,
    pub completed_at: String,
    pub elapsed: Duration,
}

impl ResultPanel {
    pub fn title(&self) -> String {
        if self.succeeded {
            format!("Output of '{}'", self.command)
        } else {
            format!("'{}' failed", self.command)
        }
    }
}

/// Everything a front end needs to draw the current state
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    ProfileEditor {
        fields: Vec<FieldView>,
        notice: Option<Notice>,
    },
    Menu {
        /// Profile summary, password masked
        profile: Vec<(&'static str, String)>,
        sections: Vec<MenuSection>,
        notice: Option<Notice>,
    },
    CommandPrompt {
        command: String,
        explanation_available: bool,
    },
    Dispatching {
        command: String,
        host: String,
    },
    Result(ResultPanel),
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::ProfileEditor { .. } => "Connection profile",
            Screen::Menu { .. } => "Commands",
            Screen::CommandPrompt { .. } => "Send command?",
            Screen::Dispatching { .. } => "Sending",
            Screen::Result(_) => "Result",
        }
    }
}

pub(super) fn build(console: &CommandConsole) -> Screen {
    let profile = console.profile();
    match console.state() {
        ConsoleState::EditingProfile => Screen::ProfileEditor {
            fields: ProfileField::ALL
                .iter()
                .map(|&field| FieldView {
                    field,
                    label: field.label(),
                    value: profile.get(field).to_string(),
                    secret: field.is_secret(),
                })
                .collect(),
            notice: console.notice().cloned(),
        },
        ConsoleState::Idle => Screen::Menu {
            profile: profile.describe(),
            sections: menu_sections(console),
            notice: console.notice().cloned(),
        },
        ConsoleState::AwaitingExplanationOrDispatch { command } => Screen::CommandPrompt {
            command: command.clone(),
            explanation_available: console.catalog().contains(command),
        },
        ConsoleState::Dispatching { command, .. } => Screen::Dispatching {
            command: command.clone(),
            host: profile.host().to_string(),
        },
        ConsoleState::ShowingResult { result } => Screen::Result(ResultPanel {
            command: result.command.clone(),
            succeeded: result.succeeded,
            body: match &result.error_detail {
                Some(detail) => detail.clone(),
                None => result.output.clone(),
            },
            completed_at: result.completed_at.format("%H:%M:%S").to_string(),
            elapsed: result.elapsed,
        }),
    }
}

fn menu_sections(console: &CommandConsole) -> Vec<MenuSection> {
    CommandGroup::ALL
        .iter()
        .map(|&group| MenuSection {
            title: group.title(),
            items: console
                .catalog()
                .group(group)
                .map(|entry| MenuItem {
                    command: entry.command,
                    label: entry.label,
                })
                .collect(),
        })
        .filter(|section| !section.items.is_empty())
        .collect()
}
