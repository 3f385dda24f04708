//! Property tests for remote path joining.

use proptest::prelude::*;

use front_deploy::domain::value_objects::{OsClass, OsProfile};

fn file_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap()
}

/// Parent `join(dir, name)` should report for a directory with separator `sep`
fn expected_parent(dir: &str, sep: char) -> String {
    let trimmed = dir.trim_end_matches(sep);
    if dir.is_empty() {
        String::new()
    } else if trimmed.is_empty() {
        sep.to_string()
    } else {
        trimmed.to_string()
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: POSIX join appends the name after exactly one separator.
    #[test]
    fn property_posix_join_then_parent(
        dir in "[a-z/]{0,24}",
        name in file_name(),
    ) {
        let profile = OsProfile::new(OsClass::Posix);
        let joined = profile.join(&dir, &name);

        let doubled = format!("//{}", name);
        prop_assert!(joined.ends_with(&name));
        prop_assert!(!joined.ends_with(&doubled));
        prop_assert_eq!(profile.parent(&joined), expected_parent(&dir, '/'));
    }

    /// PROPERTY: Windows join never leaves a forward slash behind.
    #[test]
    fn property_windows_join_uses_backslashes_only(
        dir in "[A-Za-z0-9:/\\\\]{0,24}",
        name in file_name(),
    ) {
        let profile = OsProfile::new(OsClass::Windows);
        let joined = profile.join(&dir, &name);

        prop_assert!(!joined.contains('/'));
        prop_assert!(joined.ends_with(&name));
        let normalized = dir.replace('/', "\\");
        prop_assert_eq!(profile.parent(&joined), expected_parent(&normalized, '\\'));
    }
}
