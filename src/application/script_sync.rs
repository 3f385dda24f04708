//! Remote deploy script synchronization
//!
//! The script is uploaded only when the remote copy is missing or its
//! SHA-256 differs from the local one.

use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteSession, ScriptSyncState};
use crate::domain::value_objects::{ContentHash, OsProfile, EXISTS_MARKER};
use crate::error::DeployResult;

use super::local_script::LocalScript;

/// Compare a local script with the bytes of a remote copy known to exist.
///
/// Unreadable remote content (`None`) counts as stale.
pub fn decide(local: &[u8], remote: Option<&[u8]>) -> ScriptSyncState {
    match remote {
        Some(remote) if ContentHash::from_bytes(local).matches(&ContentHash::from_bytes(remote)) => {
            ScriptSyncState::Matching
        }
        _ => ScriptSyncState::Stale,
    }
}

/// Whether `path` exists on the remote host. Probe failures mean "absent".
pub fn remote_script_exists<S>(session: &mut S, profile: &OsProfile, path: &str) -> bool
where
    S: RemoteSession + ?Sized,
{
    match session.execute(&profile.exists_probe(path)) {
        Ok(output) => profile.decode(&output.stdout).contains(EXISTS_MARKER),
        Err(_) => false,
    }
}

/// Bring the remote script at `remote_path` in line with `local`.
///
/// Uploads at most once and reports what it found.
pub fn sync_script<S>(
    session: &mut S,
    profile: &OsProfile,
    local: &LocalScript,
    remote_path: &str,
    events: &dyn DeployEventSink,
) -> DeployResult<ScriptSyncState>
where
    S: RemoteSession + ?Sized,
{
    let local_bytes = local.read()?;
    let local_hash = ContentHash::from_bytes(&local_bytes);

    let (state, remote_hash) = if remote_script_exists(session, profile, remote_path) {
        let remote_bytes = session.fetch(remote_path);
        let remote_hash = remote_bytes.as_deref().map(ContentHash::from_bytes);
        (decide(&local_bytes, remote_bytes.as_deref()), remote_hash)
    } else {
        (ScriptSyncState::Absent, None)
    };

    events.on_event(DeployEvent::ScriptChecked {
        remote: remote_path.to_string(),
        state,
        local_hash,
        remote_hash,
    });

    if state.needs_upload() {
        session.upload(local.path(), remote_path)?;
        events.on_event(DeployEvent::Uploaded {
            local: local.path().to_path_buf(),
            remote: remote_path.to_string(),
        });
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_match() {
        assert_eq!(decide(b"echo hi", Some(b"echo hi")), ScriptSyncState::Matching);
    }

    #[test]
    fn different_bytes_are_stale() {
        assert_eq!(decide(b"echo hi", Some(b"echo bye")), ScriptSyncState::Stale);
    }

    #[test]
    fn unreadable_remote_is_stale() {
        assert_eq!(decide(b"echo hi", None), ScriptSyncState::Stale);
    }

    #[test]
    fn line_endings_count_as_a_difference() {
        assert_eq!(
            decide(b"echo hi\r\n", Some(b"echo hi\n")),
            ScriptSyncState::Stale
        );
    }
}
