//! Contract Tests: View Models
//!
//! What a front end can rely on finding in each `Screen`.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use netconsole::catalog::CommandCatalog;
use netconsole::console::{CommandConsole, Notice, Screen, UserAction};
use netconsole::models::{ProfileField, PASSWORD_MASK};
use test_utils::{create_editing_console, create_idle_console, select_and_send, MockTransport};

#[test]
fn test_initial_screen_shows_placeholder_profile() {
    let console = CommandConsole::default();
    let Screen::ProfileEditor { fields, notice } = console.screen() else {
        panic!("console should start in the profile editor");
    };

    let values: Vec<(ProfileField, String)> =
        fields.iter().map(|f| (f.field, f.value.clone())).collect();
    assert_eq!(
        values,
        vec![
            (ProfileField::Name, "some connection".to_string()),
            (ProfileField::Host, "1.1.1.1".to_string()),
            (ProfileField::Username, "some_username".to_string()),
            (ProfileField::Password, "(not set)".to_string()),
        ]
    );
    assert!(notice.is_none());
}

#[test]
fn test_editor_surfaces_validation_notice() {
    let mut console = CommandConsole::default();
    let _ = console.handle(UserAction::SubmitProfile);

    let Screen::ProfileEditor {
        notice: Some(Notice::Error(message)),
        ..
    } = console.screen()
    else {
        panic!("expected an error notice in the profile editor");
    };
    assert!(message.contains("Password"));
}

#[test]
fn test_menu_lists_every_catalogued_command() {
    let console = create_idle_console();
    let catalog = CommandCatalog::built_in();

    let Screen::Menu {
        profile, sections, ..
    } = console.screen()
    else {
        panic!("expected the menu");
    };

    let listed: Vec<&str> = sections
        .iter()
        .flat_map(|s| s.items.iter().map(|i| i.command))
        .collect();
    assert_eq!(listed.len(), catalog.len());
    for entry in catalog.all() {
        assert!(listed.contains(&entry.command), "{} missing", entry.command);
    }

    assert!(profile.contains(&("Host", "10.0.0.1".to_string())));
    assert!(profile.contains(&("Password", PASSWORD_MASK.to_string())));
}

#[test]
fn test_prompt_reports_explanation_availability() {
    let mut console = create_idle_console();
    console
        .handle(UserAction::Select("show ip interface brief".to_string()))
        .unwrap();
    assert_eq!(
        console.screen(),
        Screen::CommandPrompt {
            command: "show ip interface brief".to_string(),
            explanation_available: true,
        }
    );

    console.handle(UserAction::Cancel).unwrap();
    console
        .handle(UserAction::ManualEntry("show clock".to_string()))
        .unwrap();
    assert_eq!(
        console.screen(),
        Screen::CommandPrompt {
            command: "show clock".to_string(),
            explanation_available: false,
        }
    );
}

#[test]
fn test_dispatching_screen_names_host() {
    let mut console = create_editing_console();
    console.handle(UserAction::SubmitProfile).unwrap();
    select_and_send(&mut console, "show running config");

    assert_eq!(
        console.screen(),
        Screen::Dispatching {
            command: "show running config".to_string(),
            host: "10.0.0.1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_result_panel_for_success_and_failure() {
    let mut console = create_idle_console();
    select_and_send(&mut console, "show ip interface brief");
    console
        .run_pending(&MockTransport::new().respond("show ip interface brief", "Gi0/0 up up\r\n"))
        .await
        .unwrap();

    let Screen::Result(panel) = console.screen() else {
        panic!("expected a result panel");
    };
    assert!(panel.succeeded);
    assert_eq!(panel.body, "Gi0/0 up up\n");
    assert_eq!(panel.title(), "Output of 'show ip interface brief'");

    console.handle(UserAction::Acknowledge).unwrap();
    select_and_send(&mut console, "show ip interface brief");
    console
        .run_pending(&MockTransport::new().failing_connect("connection refused"))
        .await
        .unwrap();

    let Screen::Result(panel) = console.screen() else {
        panic!("expected a result panel");
    };
    assert!(!panel.succeeded);
    assert!(panel.body.contains("connection refused"));
}
