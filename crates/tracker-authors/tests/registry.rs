//! Integration tests for the author registry.

use proptest::prelude::*;

use tracker_authors::{
    AuthorRegistry, AuthorSettings, UNKNOWN_AUTHOR, format_author_list, normalize_author_name,
    parse_author_list,
};

#[test]
fn test_preference_list_round_trip() {
    let mut registry = AuthorRegistry::new();
    for name in parse_author_list("Alice,Bob , Émile") {
        registry.add(&name).unwrap();
    }
    let settings = registry.to_settings();
    assert_eq!(format_author_list(&settings.authors), "alice,bob,emile");
    assert_eq!(settings.active.as_deref(), Some("emile"));
}

#[test]
fn test_selection_survives_author_removal_of_others() {
    let mut registry = AuthorRegistry::new();
    registry.add("alice").unwrap();
    registry.add("bob").unwrap();
    registry.set_selected(["alice", "bob"]);
    registry.remove("bob");
    assert!(registry.is_selected("alice"));
    assert!(!registry.is_selected("bob"));
}

#[test]
fn test_settings_json_shape() {
    let settings = AuthorSettings {
        authors: vec!["alice".to_string()],
        active: None,
        selected: vec!["alice".to_string()],
    };
    let json = serde_json::to_string(&settings).unwrap();
    assert_eq!(json, r#"{"authors":["alice"],"selected":["alice"]}"#);
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn removing_every_author_leaves_unknown(names in prop::collection::vec("[A-Za-z ]{1,10}", 0..8)) {
        let mut registry = AuthorRegistry::new();
        let mut added = Vec::new();
        for name in &names {
            if let Ok(normalized) = registry.add(name) {
                added.push(normalized);
            }
        }
        for name in &added {
            registry.remove(name);
        }

        prop_assert_eq!(registry.authors().collect::<Vec<_>>(), vec![UNKNOWN_AUTHOR]);
        prop_assert_eq!(registry.active(), UNKNOWN_AUTHOR);
        registry.set_selected(["alice"]);
        prop_assert!(registry.is_selected("alice"));
        prop_assert!(registry.set_active(UNKNOWN_AUTHOR).is_ok());
    }

    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,16}") {
        let once = normalize_author_name(&raw);
        prop_assert_eq!(normalize_author_name(&once), once.clone());
        prop_assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }
}
