//! Test Utilities and Mocks
//!
//! Scripted transport and fixtures shared by the integration, contract and
//! security tests. Included from each test target with `#[path]`.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_transport;

// Re-exports for convenience
pub use fixtures::{
    create_editing_console, create_idle_console, create_test_profile, create_test_settings,
    select_and_send, TEST_PASSWORD,
};
pub use mock_transport::MockTransport;
