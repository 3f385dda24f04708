//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (value objects, ports)
//! - Does NOT open connections or spawn processes itself
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Orchestrates the deploy run (config, build, archive, connect, sync, execute)
//!
//! ## Steps
//!
//! - `detect_os` - Classify the remote host
//! - `resolve_local_script` - Pick the deploy script to upload
//! - `sync_script` - Upload the script only when its hash changed
//! - `invoke_script` - Run the script with its five arguments

pub mod deploy;
pub mod invoke;
pub mod local_script;
pub mod os_detect;
pub mod script_sync;

pub use deploy::{DeployReport, DeployRequest, DeployUseCase};
pub use invoke::{build_command_line, invoke_script, ScriptArgs};
pub use local_script::{bundled_script, resolve_local_script, LocalScript};
pub use os_detect::{detect_os, OsDetection};
pub use script_sync::{decide, remote_script_exists, sync_script};
