//! Deploy Module
//!
//! Orchestrates one deploy run.
//!
//! ## Structure
//!
//! - `options` - Inputs (`DeployRequest`)
//! - `result` - Outcome (`DeployReport`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use front_deploy::application::deploy::{DeployRequest, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(ProcessRunner::new(), Ssh2Connector::new());
//! let report = use_case.execute(&DeployRequest::new(project_root))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployRequest;
pub use result::DeployReport;
pub use use_case::DeployUseCase;
