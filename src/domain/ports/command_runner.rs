//! CommandRunner port - runs local programs (build tool, archiver)

use std::path::Path;

use crate::error::DeployResult;

/// Runs a local program to completion.
///
/// Implementations:
/// - `ProcessRunner` - spawns a child process with inherited stdio
/// - recording fakes in tests
pub trait CommandRunner {
    /// Run `program` with `args` inside `cwd`.
    ///
    /// Returns `Ok(())` only when the program exits with status 0.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> DeployResult<()>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> DeployResult<()> {
        (**self).run(program, args, cwd)
    }
}
