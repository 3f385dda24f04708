//! Error types for front-deploy
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`
//! and maps them to a process exit status in one place.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Config file is missing or cannot be read
    #[error("config file {path} not found or unreadable - create it (see deploy.example.toml) or pass --config <path>")]
    ConfigMissing { path: PathBuf },

    /// Config file exists but is not valid TOML
    #[error("invalid config in {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Local process exited with a non-zero status
    #[error("command `{}` failed with {}", render_command(.command, .args), render_exit(.exit_code))]
    LocalCommandFailed {
        command: String,
        args: Vec<String>,
        exit_code: Option<i32>,
    },

    /// Local process could not be spawned
    #[error("failed to start `{command}`: {source}")]
    LocalCommandError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// SSH connection or authentication failed
    #[error("failed to connect to remote server: {reason}")]
    ConnectFailed { reason: String },

    /// The transport closed or keepalives went unanswered
    #[error("connection to remote server lost: {reason}")]
    ConnectionLost { reason: String },

    /// Upload to the remote host failed
    #[error("file transfer failed for {path}: {reason}")]
    TransferFailed { path: String, reason: String },

    /// The local deploy script could not be prepared for upload
    #[error("deploy script unavailable: {reason}")]
    ScriptUnavailable { reason: String },

    /// Remote deploy script exited with a non-zero status
    #[error("remote script failed with {}{}", render_exit(.exit_code), render_stderr(.stderr))]
    RemoteScriptFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Run aborted by Ctrl+C between steps
    #[error("deploy interrupted")]
    Interrupted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Process exit status for this failure category
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::ConfigMissing { .. } | DeployError::ConfigInvalid { .. } => 2,
            DeployError::Interrupted => 130,
            _ => 1,
        }
    }
}

fn render_command(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

fn render_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

fn render_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}
