//! Property-based tests for connection profile validation

use netconsole::models::{
    is_valid_host, ConnectionProfile, ProfileError, ProfileField, PASSWORD_MASK,
};
use proptest::prelude::*;

fn ipv4() -> impl Strategy<Value = String> {
    any::<[u8; 4]>().prop_map(|[a, b, c, d]| format!("{}.{}.{}.{}", a, b, c, d))
}

fn hostname() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,10}(\\.[a-z][a-z0-9]{0,10}){0,3}"
}

fn host() -> impl Strategy<Value = String> {
    prop_oneof![ipv4(), hostname()]
}

fn field() -> impl Strategy<Value = ProfileField> {
    prop::sample::select(ProfileField::ALL.to_vec())
}

fn edits() -> impl Strategy<Value = Vec<(ProfileField, String)>> {
    prop::collection::vec((field(), "[a-zA-Z0-9 ._-]{0,16}"), 0..12)
}

proptest! {
    #[test]
    fn test_complete_profiles_validate(
        name in "[a-zA-Z0-9 ]{1,20}",
        host in host(),
        username in "[a-z_]{1,16}",
        password in "pw-[a-zA-Z0-9!@#]{4,20}",
    ) {
        let profile = ConnectionProfile::new(name, host, username, password);
        prop_assert_eq!(profile.validate(), Ok(()));
    }

    #[test]
    fn test_first_empty_field_is_reported(
        host in host(),
        empty in prop::collection::vec(any::<bool>(), 4),
    ) {
        prop_assume!(empty.iter().any(|e| *e));

        let mut profile = ConnectionProfile::new("core1", host, "admin", "secret");
        for (field, is_empty) in ProfileField::ALL.iter().zip(&empty) {
            if *is_empty {
                profile.set(*field, "");
            }
        }

        let first = ProfileField::ALL
            .iter()
            .zip(&empty)
            .find(|(_, e)| **e)
            .map(|(f, _)| *f)
            .unwrap();
        prop_assert_eq!(
            profile.validate(),
            Err(ProfileError::IncompleteProfile { field: first })
        );
    }

    #[test]
    fn test_debug_never_shows_password(
        name in "[a-z]{1,10}",
        host in host(),
        password in "pw-[a-zA-Z0-9!@#]{4,20}",
    ) {
        let profile = ConnectionProfile::new(name, host, "admin", password.clone());
        let debug = format!("{:?}", profile);
        prop_assert!(!debug.contains(&password));
        let described = format!("{:?}", profile.describe());
        prop_assert!(!described.contains(&password));
    }

    #[test]
    fn test_describe_reflects_last_set_values(edits in edits()) {
        let mut profile = ConnectionProfile::placeholder();
        let mut expected: Vec<String> = ProfileField::ALL
            .iter()
            .map(|f| profile.get(*f).to_string())
            .collect();
        let mut password = String::new();

        for (field, value) in &edits {
            profile.set(*field, value.clone());
            let slot = ProfileField::ALL.iter().position(|f| f == field).unwrap();
            if field.is_secret() {
                password = value.clone();
                expected[slot] = if value.is_empty() {
                    "(not set)".to_string()
                } else {
                    PASSWORD_MASK.to_string()
                };
            } else {
                expected[slot] = value.clone();
            }
        }

        let described = profile.describe();
        let labels: Vec<&str> = described.iter().map(|(label, _)| *label).collect();
        prop_assert_eq!(labels, vec!["Name", "Host", "Username", "Password"]);
        let values: Vec<String> = described.into_iter().map(|(_, value)| value).collect();
        prop_assert_eq!(values, expected);
        prop_assert_eq!(profile.password(), password.as_str());
    }

    #[test]
    fn test_host_check_doesnt_panic(s in "\\PC*") {
        let _ = is_valid_host(&s);
    }

    #[test]
    fn test_hosts_with_spaces_rejected(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        let host = format!("{} {}", a, b);
        prop_assert!(!is_valid_host(&host));
    }
}
