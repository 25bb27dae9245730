//! Property-based tests for catalog lookup

use netconsole::catalog::{CommandCatalog, CommandGroup};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_lookup_is_total(s in "\\PC*") {
        let catalog = CommandCatalog::built_in();
        let explanation = catalog.lookup(&s);
        prop_assert_eq!(explanation.is_some(), catalog.contains(&s));
    }

    #[test]
    fn test_lookup_is_exact(index in 0usize..8, suffix in "[a-z ]{1,5}") {
        let catalog = CommandCatalog::built_in();
        let entry = catalog.all().nth(index % catalog.len()).unwrap();

        prop_assert_eq!(catalog.lookup(entry.command), Some(entry.explanation));

        let altered = format!("{}{}", entry.command, suffix);
        prop_assert!(catalog.lookup(&altered).is_none());
    }

    #[test]
    fn test_group_follows_leading_verb(rest in "[a-z ]{0,20}") {
        prop_assert_eq!(CommandGroup::of(&format!("show {}", rest)), Some(CommandGroup::Show));
        prop_assert_eq!(CommandGroup::of(&format!("clear {}", rest)), Some(CommandGroup::Clear));
        prop_assert_eq!(CommandGroup::of(&format!("reload {}", rest)), None);
    }
}

#[test]
fn test_every_entry_is_explained_and_grouped() {
    let catalog = CommandCatalog::built_in();
    assert_eq!(catalog.len(), 8);
    for entry in catalog.all() {
        assert!(!entry.explanation.is_empty());
        assert!(!entry.label.is_empty());
        assert_eq!(CommandGroup::of(entry.command), Some(entry.group));
    }
}
