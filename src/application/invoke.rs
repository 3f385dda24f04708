//! Remote deploy script invocation

use crate::config::DeployConfig;
use crate::domain::ports::{CommandOutput, DeployEvent, DeployEventSink, RemoteSession};
use crate::domain::value_objects::{DeployTimestamp, OsClass, OsProfile};
use crate::error::{DeployError, DeployResult};

/// The five positional arguments of the deploy script, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptArgs {
    pub remote_dir: String,
    pub backup_dir: String,
    pub dist_name: String,
    pub archive_name: String,
    pub timestamp: DeployTimestamp,
}

impl ScriptArgs {
    pub fn new(config: &DeployConfig, timestamp: DeployTimestamp) -> Self {
        Self {
            remote_dir: config.remote_dir.clone(),
            backup_dir: config.remote_backdir.clone(),
            dist_name: config.remote_distname.clone(),
            archive_name: config.archive_file_name(),
            timestamp,
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        vec![
            self.remote_dir.clone(),
            self.backup_dir.clone(),
            self.dist_name.clone(),
            self.archive_name.clone(),
            self.timestamp.to_string(),
        ]
    }
}

/// Full command line running `script` on the remote host.
///
/// POSIX runs from the script's directory, Windows from `REMOTE_DIR`.
pub fn build_command_line(profile: &OsProfile, script: &str, args: &ScriptArgs) -> String {
    let invocation = profile.script_invocation(script, &args.to_vec());
    let workdir = match profile.class() {
        OsClass::Posix => profile.parent(script),
        OsClass::Windows => args.remote_dir.as_str(),
    };
    profile.in_directory(workdir, &invocation)
}

/// Run the deploy script and decode its output.
///
/// A non-zero exit fails with [`DeployError::RemoteScriptFailed`] after the
/// output has been reported.
pub fn invoke_script<S>(
    session: &mut S,
    profile: &OsProfile,
    script: &str,
    args: &ScriptArgs,
    events: &dyn DeployEventSink,
) -> DeployResult<CommandOutput>
where
    S: RemoteSession + ?Sized,
{
    let command_line = build_command_line(profile, script, args);
    events.on_event(DeployEvent::RemoteCommand {
        command_line: command_line.clone(),
    });

    let output = session.execute(&command_line)?.decode(profile);
    events.on_event(DeployEvent::RemoteOutput {
        stdout: output.stdout.clone(),
        stderr: output.stderr.clone(),
    });

    if !output.success() {
        return Err(DeployError::RemoteScriptFailed {
            exit_code: output.exit_status,
            stderr: output.stderr.clone(),
        });
    }
    Ok(output)
}
