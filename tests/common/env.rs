//! Runs the front-deploy binary in an isolated working directory.

use std::path::Path;
use std::process::Command;

use front_deploy::config::CONFIG_KEYS;

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Run the binary from `cwd` with deploy variables cleared from the environment
pub fn run_cli(cwd: &Path, args: &[&str]) -> TestResult {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_front-deploy"));
    cmd.current_dir(cwd)
        .args(args)
        .env("NO_COLOR", "1")
        .env("TERM", "dumb");
    for key in CONFIG_KEYS {
        cmd.env_remove(key);
    }

    let output = cmd.output().expect("failed to run front-deploy");
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
