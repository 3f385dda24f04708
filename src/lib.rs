//! front-deploy - one-shot frontend release over SSH
//!
//! Builds the project locally, archives the output, connects to the target
//! host, detects its operating system, uploads the archive, keeps the remote
//! deploy script in sync by content hash and runs it with five arguments
//! (target dir, backup dir, dist name, archive name, timestamp).

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployReport, DeployRequest, DeployUseCase};
pub use config::{Auth, DeployConfig};
pub use domain::value_objects::{OsClass, OsProfile};
pub use error::{DeployError, DeployResult};
