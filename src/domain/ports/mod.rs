//! Ports - interfaces the application layer depends on

mod command_runner;
mod deploy_events;
mod remote_session;

pub use command_runner::CommandRunner;
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink, ScriptSyncState};
pub use remote_session::{CommandOutput, RawOutput, RemoteConnector, RemoteSession};
