//! Property-based tests for the typing effect

use std::time::Duration;

use netconsole::typing::reveal;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_reveal_is_prefix(
        text in "\\PC{0,80}",
        elapsed_ms in 0u64..10_000,
        cps in 1.0f64..500.0,
    ) {
        let shown = reveal(&text, Duration::from_millis(elapsed_ms), cps);
        prop_assert!(text.starts_with(&shown));
    }

    #[test]
    fn test_reveal_is_monotonic(
        text in "\\PC{0,80}",
        earlier_ms in 0u64..5_000,
        extra_ms in 0u64..5_000,
        cps in 1.0f64..500.0,
    ) {
        let earlier = reveal(&text, Duration::from_millis(earlier_ms), cps);
        let later = reveal(&text, Duration::from_millis(earlier_ms + extra_ms), cps);
        prop_assert!(later.starts_with(&earlier));
        prop_assert!(later.chars().count() >= earlier.chars().count());
    }

    #[test]
    fn test_reveal_count_matches_rate(
        text in "[a-z ]{0,80}",
        elapsed_ms in 0u64..10_000,
        cps in 1.0f64..100.0,
    ) {
        let shown = reveal(&text, Duration::from_millis(elapsed_ms), cps);
        let expected = (Duration::from_millis(elapsed_ms).as_secs_f64() * cps).round() as usize;
        prop_assert_eq!(shown.chars().count(), expected.min(text.chars().count()));
    }

    #[test]
    fn test_enough_time_reveals_everything(text in "\\PC{0,80}", cps in 1.0f64..500.0) {
        let needed = Duration::from_secs_f64(text.chars().count() as f64 / cps + 1.0);
        prop_assert_eq!(reveal(&text, needed, cps), text);
    }

    #[test]
    fn test_disabled_speed_reveals_everything(text in "\\PC{0,80}", cps in -100.0f64..=0.0) {
        prop_assert_eq!(reveal(&text, Duration::ZERO, cps), text.clone());
    }
}
