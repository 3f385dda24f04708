//! Deploy Report
//!
//! What a successful run did.

use crate::domain::ports::{CommandOutput, ScriptSyncState};
use crate::domain::value_objects::{DeployTimestamp, OsClass};

/// Result of a deploy run
#[derive(Debug, Clone)]
pub struct DeployReport {
    /// Detected remote OS
    pub os: OsClass,
    /// True when the OS was guessed after inconclusive probes
    pub os_fallback: bool,
    /// Remote archive path
    pub archive_remote: String,
    /// Remote script path
    pub script_remote: String,
    /// Script state found before syncing
    pub script_state: ScriptSyncState,
    /// Timestamp passed to the script
    pub timestamp: DeployTimestamp,
    /// Decoded script output
    pub output: CommandOutput,
}

impl DeployReport {
    pub fn script_uploaded(&self) -> bool {
        self.script_state.needs_upload()
    }
}
