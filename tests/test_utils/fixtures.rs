//! Test Fixtures
//!
//! Common test data and fixtures for testing

use std::time::Duration;

use netconsole::catalog::CommandCatalog;
use netconsole::console::{CommandConsole, DispatchRequest, DispatchSettings, Outcome, UserAction};
use netconsole::models::ConnectionProfile;

/// Password used by fixture profiles; tests check it never leaks
pub const TEST_PASSWORD: &str = "s3cr3t-Pa55word";

/// A complete, valid profile
pub fn create_test_profile() -> ConnectionProfile {
    ConnectionProfile::new("core1", "10.0.0.1", "admin", TEST_PASSWORD)
}

/// Short timeouts so failing tests fail fast
pub fn create_test_settings() -> DispatchSettings {
    DispatchSettings {
        connect_timeout: Duration::from_secs(2),
        command_timeout: Duration::from_secs(2),
    }
}

/// Console with the test profile, still editing it
pub fn create_editing_console() -> CommandConsole {
    CommandConsole::with_profile(
        create_test_profile(),
        CommandCatalog::built_in(),
        create_test_settings(),
    )
}

/// Console with the test profile already submitted
pub fn create_idle_console() -> CommandConsole {
    let mut console = create_editing_console();
    console
        .handle(UserAction::SubmitProfile)
        .expect("test profile should be valid");
    console
}

/// Select `command` on an idle console and send it
pub fn select_and_send(console: &mut CommandConsole, command: &str) -> DispatchRequest {
    console
        .handle(UserAction::Select(command.to_string()))
        .expect("select should be accepted while idle");
    match console.handle(UserAction::Send).expect("send should be accepted") {
        Outcome::Dispatch(request) => request,
        other => panic!("send did not produce a dispatch request: {:?}", other),
    }
}
