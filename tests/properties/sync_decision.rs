//! Property tests for the deploy script sync decision.

use proptest::prelude::*;

use front_deploy::application::decide;
use front_deploy::domain::ports::ScriptSyncState;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: identical content never triggers an upload.
    #[test]
    fn property_identical_content_matches(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let state = decide(&bytes, Some(&bytes));
        prop_assert_eq!(state, ScriptSyncState::Matching);
        prop_assert!(!state.needs_upload());
    }

    /// PROPERTY: any difference in content triggers an upload.
    #[test]
    fn property_different_content_is_stale(
        local in proptest::collection::vec(any::<u8>(), 0..256),
        remote in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        prop_assume!(local != remote);
        let state = decide(&local, Some(&remote));
        prop_assert_eq!(state, ScriptSyncState::Stale);
        prop_assert!(state.needs_upload());
    }

    /// PROPERTY: an unreadable remote copy is always replaced.
    #[test]
    fn property_unreadable_remote_is_stale(local in proptest::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(decide(&local, None), ScriptSyncState::Stale);
    }
}
