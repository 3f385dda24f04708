//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process` - Local command runner (build, archive)
//! - `ssh/` - SSH connector and session (exec, SFTP, keepalive)

pub mod process;
pub mod ssh;

// Re-export for convenience
pub use process::ProcessRunner;
pub use ssh::{KeepalivePolicy, Ssh2Connector, Ssh2Session};
