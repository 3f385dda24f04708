//! Per-run deploy stage machine

use std::fmt;

/// Stages of one deploy run, in the order they are reached.
///
/// Any failure moves the run to [`DeployStage::Failed`]; no stage is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeployStage {
    Idle,
    ConfigLoaded,
    Built,
    Archived,
    Connected,
    OsDetected,
    ArchiveUploaded,
    ScriptSynced,
    ScriptExecuted,
    Done,
    Failed,
}

impl DeployStage {
    /// Stage that follows this one on success; `None` for terminal stages
    pub fn next(self) -> Option<DeployStage> {
        use DeployStage::*;
        match self {
            Idle => Some(ConfigLoaded),
            ConfigLoaded => Some(Built),
            Built => Some(Archived),
            Archived => Some(Connected),
            Connected => Some(OsDetected),
            OsDetected => Some(ArchiveUploaded),
            ArchiveUploaded => Some(ScriptSynced),
            ScriptSynced => Some(ScriptExecuted),
            ScriptExecuted => Some(Done),
            Done | Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeployStage::Done | DeployStage::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            DeployStage::Idle => "idle",
            DeployStage::ConfigLoaded => "config loaded",
            DeployStage::Built => "built",
            DeployStage::Archived => "archived",
            DeployStage::Connected => "connected",
            DeployStage::OsDetected => "os detected",
            DeployStage::ArchiveUploaded => "archive uploaded",
            DeployStage::ScriptSynced => "script synced",
            DeployStage::ScriptExecuted => "script executed",
            DeployStage::Done => "done",
            DeployStage::Failed => "failed",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
