//! Deploy Event Port
//!
//! Provides an observable interface for the deploy run.
//! The CLI renders these to the console; tests record them.

use std::path::PathBuf;

use crate::config::ConfigWarning;
use crate::domain::value_objects::{ContentHash, DeployStage, OsClass};

/// State of the remote deploy script relative to the local copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSyncState {
    /// Not on the remote host yet
    Absent,
    /// Present with identical content
    Matching,
    /// Present with different (or unreadable) content
    Stale,
}

impl ScriptSyncState {
    /// Whether this state calls for an upload
    pub fn needs_upload(self) -> bool {
        !matches!(self, ScriptSyncState::Matching)
    }
}

/// Event emitted during a deploy run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// The run moved to a new stage
    StageReached { stage: DeployStage },

    /// Unknown key in the config file
    ConfigWarning(ConfigWarning),

    /// A step was skipped on request
    StepSkipped { stage: DeployStage, reason: String },

    /// About to run a local program
    LocalCommandStarted { program: String, args: Vec<String> },

    /// SSH session established
    Connected { host: String, port: u16, user: String },

    /// Output of one OS probe (verbose detail)
    OsProbe {
        command: String,
        stdout: String,
        stderr: String,
    },

    /// Remote OS classified
    OsDetected { os: OsClass, fallback: bool },

    /// File uploaded to the remote host
    Uploaded { local: PathBuf, remote: String },

    /// Local script chosen for upload
    ScriptResolved { local: PathBuf, bundled: bool },

    /// Remote script compared against the local copy
    ScriptChecked {
        remote: String,
        state: ScriptSyncState,
        local_hash: ContentHash,
        remote_hash: Option<ContentHash>,
    },

    /// Remote command about to run (verbose detail)
    RemoteCommand { command_line: String },

    /// Decoded output of the deploy script
    RemoteOutput { stdout: String, stderr: String },

    /// Non-fatal problem worth surfacing
    Warning { message: String },

    /// SSH session closed
    SessionReleased,

    /// Run failed after reaching `stage`
    Failed { stage: DeployStage, message: String },

    /// Run finished
    Completed { elapsed_ms: u64 },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}
