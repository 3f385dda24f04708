//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::application::DeployUseCase;
use crate::infrastructure::{ProcessRunner, Ssh2Connector};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<ProcessRunner, Ssh2Connector>;

/// Create a deploy use case backed by local processes and libssh2.
///
/// Setting `cancel` aborts the run before its next step.
pub fn create_deploy_use_case(cancel: Arc<AtomicBool>) -> ConcreteDeployUseCase {
    DeployUseCase::new(ProcessRunner::new(), Ssh2Connector::new()).with_cancel_flag(cancel)
}
