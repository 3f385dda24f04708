//! Local process runner
//!
//! Implements the CommandRunner port with `std::process::Command`.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::domain::ports::CommandRunner;
use crate::error::{DeployError, DeployResult};

/// Spawns programs with inherited stdio so their output shows up live.
///
/// Arguments are passed as a list, never as one shell string. On Windows
/// the program goes through `cmd /C` so `.cmd` shims such as
/// `npm.cmd` resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(program: &str, args: &[String]) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(program).args(args);
            cmd
        } else {
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> DeployResult<()> {
        let status = Self::command(program, args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| DeployError::LocalCommandError {
                command: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DeployError::LocalCommandFailed {
                command: program.to_string(),
                args: args.to_vec(),
                exit_code: status.code(),
            })
        }
    }
}
