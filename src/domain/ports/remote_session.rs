//! Remote session ports - one SSH connection per run
//!
//! The orchestrator receives a [`RemoteConnector`] and owns the session it
//! returns for the rest of the run. Nothing is shared process-wide.

use std::path::Path;

use crate::config::DeployConfig;
use crate::domain::value_objects::OsProfile;
use crate::error::DeployResult;

/// Undecoded output of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Remote exit status; `None` when the server did not report one
    pub exit_status: Option<i32>,
}

impl RawOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>, exit_status: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status: Some(exit_status),
        }
    }

    /// True when stdout holds something other than whitespace
    pub fn has_stdout(&self) -> bool {
        !self.stdout.iter().all(u8::is_ascii_whitespace)
    }

    /// True when stderr holds something other than whitespace
    pub fn has_stderr(&self) -> bool {
        !self.stderr.iter().all(u8::is_ascii_whitespace)
    }

    /// Decode both streams with the remote OS's code page
    pub fn decode(&self, profile: &OsProfile) -> CommandOutput {
        CommandOutput {
            stdout: profile.decode(&self.stdout),
            stderr: profile.decode(&self.stderr),
            exit_status: self.exit_status,
        }
    }
}

/// Decoded output of a remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_status == Some(0)
    }
}

/// One live connection to the remote host
pub trait RemoteSession {
    /// Run a command line on the remote host and capture its raw output.
    ///
    /// A non-zero exit is reported in [`RawOutput::exit_status`], not as an error.
    fn execute(&mut self, command_line: &str) -> DeployResult<RawOutput>;

    /// Upload a local file to an absolute remote path, overwriting it.
    fn upload(&mut self, local: &Path, remote: &str) -> DeployResult<()>;

    /// Download a remote file; `None` when it is missing or unreadable.
    fn fetch(&mut self, remote: &str) -> Option<Vec<u8>>;

    /// Close the connection. Idempotent.
    fn release(&mut self);
}

/// Opens [`RemoteSession`]s
pub trait RemoteConnector {
    type Session: RemoteSession;

    fn connect(&self, config: &DeployConfig) -> DeployResult<Self::Session>;
}
