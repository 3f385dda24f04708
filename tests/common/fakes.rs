//! In-memory stand-ins for the SSH host and the local toolchain.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use front_deploy::config::DeployConfig;
use front_deploy::domain::ports::{
    CommandRunner, DeployEvent, DeployEventSink, RawOutput, RemoteConnector, RemoteSession,
};
use front_deploy::domain::value_objects::{DeployStage, OsClass, OsProfile, EXISTS_MARKER};
use front_deploy::{DeployError, DeployResult};

/// How the fake host answers the OS probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Linux,
    Windows,
    /// Answers both probes with nothing at all
    Silent,
}

/// One file transfer seen by the fake host
#[derive(Debug, Clone)]
pub struct Upload {
    pub local: PathBuf,
    pub remote: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct HostLog {
    pub connects: usize,
    pub releases: usize,
    pub commands: Vec<String>,
    pub uploads: Vec<Upload>,
    pub fetches: Vec<String>,
}

struct HostState {
    kind: HostKind,
    files: HashMap<String, Vec<u8>>,
    refuse: Option<String>,
    script_exit: i32,
    script_stdout: String,
    script_stderr: String,
    log: HostLog,
}

/// Shared handle on a scripted remote host
#[derive(Clone)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new(kind: HostKind) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                kind,
                files: HashMap::new(),
                refuse: None,
                script_exit: 0,
                script_stdout: "deployed\n".to_string(),
                script_stderr: String::new(),
                log: HostLog::default(),
            })),
        }
    }

    pub fn linux() -> Self {
        Self::new(HostKind::Linux)
    }

    pub fn windows() -> Self {
        Self::new(HostKind::Windows)
    }

    /// Place a file on the host before the run
    pub fn with_file(self, remote: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(remote.to_string(), bytes.into());
        self
    }

    /// Make every connection attempt fail with `reason`
    pub fn refusing(self, reason: &str) -> Self {
        self.state.lock().unwrap().refuse = Some(reason.to_string());
        self
    }

    pub fn with_script_result(self, exit: i32, stdout: &str, stderr: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.script_exit = exit;
            state.script_stdout = stdout.to_string();
            state.script_stderr = stderr.to_string();
        }
        self
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector { host: self.clone() }
    }

    /// Inspect the log under the lock
    pub fn log<T>(&self, f: impl FnOnce(&HostLog) -> T) -> T {
        f(&self.state.lock().unwrap().log)
    }

    pub fn uploads_to(&self, remote: &str) -> Vec<Upload> {
        self.log(|log| {
            log.uploads
                .iter()
                .filter(|u| u.remote == remote)
                .cloned()
                .collect()
        })
    }

    /// The command lines that were neither OS nor existence probes
    pub fn script_runs(&self) -> Vec<String> {
        self.log(|log| {
            log.commands
                .iter()
                .filter(|c| !is_probe(c))
                .cloned()
                .collect()
        })
    }

    pub fn file(&self, remote: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(remote).cloned()
    }

    fn answer(&self, command_line: &str) -> RawOutput {
        let mut state = self.state.lock().unwrap();
        state.log.commands.push(command_line.to_string());

        if command_line == OsClass::Posix.probe_command() {
            return match state.kind {
                HostKind::Linux => {
                    RawOutput::new("Linux web01 6.1.0-18-amd64 x86_64 GNU/Linux\n", "", 0)
                }
                HostKind::Windows => RawOutput::new(
                    "",
                    "'uname' is not recognized as an internal or external command,\r\n",
                    1,
                ),
                HostKind::Silent => RawOutput::new("", "", 0),
            };
        }
        if command_line == OsClass::Windows.probe_command() {
            return match state.kind {
                HostKind::Windows => {
                    RawOutput::new("\r\nMicrosoft Windows [Version 10.0.17763.5458]\r\n", "", 0)
                }
                _ => RawOutput::new("", "", 0),
            };
        }
        if is_exists_probe(command_line) {
            let found = state.files.keys().any(|path| {
                [OsClass::Posix, OsClass::Windows]
                    .iter()
                    .any(|os| OsProfile::new(*os).exists_probe(path) == command_line)
            });
            let stdout = if found {
                format!("{}\r\n", EXISTS_MARKER)
            } else {
                "File not found\r\n".to_string()
            };
            return RawOutput::new(stdout, "", 0);
        }

        RawOutput::new(
            state.script_stdout.clone(),
            state.script_stderr.clone(),
            state.script_exit,
        )
    }
}

fn is_exists_probe(command_line: &str) -> bool {
    command_line.starts_with("test -f ") || command_line.starts_with("if exist ")
}

fn is_probe(command_line: &str) -> bool {
    is_exists_probe(command_line)
        || command_line == OsClass::Posix.probe_command()
        || command_line == OsClass::Windows.probe_command()
}

pub struct FakeConnector {
    host: FakeHost,
}

impl RemoteConnector for FakeConnector {
    type Session = FakeSession;

    fn connect(&self, _config: &DeployConfig) -> DeployResult<FakeSession> {
        let mut state = self.host.state.lock().unwrap();
        if let Some(reason) = &state.refuse {
            return Err(DeployError::ConnectFailed {
                reason: reason.clone(),
            });
        }
        state.log.connects += 1;
        Ok(FakeSession {
            host: self.host.clone(),
            connected: true,
        })
    }
}

pub struct FakeSession {
    host: FakeHost,
    connected: bool,
}

impl RemoteSession for FakeSession {
    fn execute(&mut self, command_line: &str) -> DeployResult<RawOutput> {
        Ok(self.host.answer(command_line))
    }

    fn upload(&mut self, local: &Path, remote: &str) -> DeployResult<()> {
        let bytes = std::fs::read(local).map_err(|e| DeployError::TransferFailed {
            path: local.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut state = self.host.state.lock().unwrap();
        state.files.insert(remote.to_string(), bytes.clone());
        state.log.uploads.push(Upload {
            local: local.to_path_buf(),
            remote: remote.to_string(),
            bytes,
        });
        Ok(())
    }

    fn fetch(&mut self, remote: &str) -> Option<Vec<u8>> {
        let mut state = self.host.state.lock().unwrap();
        state.log.fetches.push(remote.to_string());
        state.files.get(remote).cloned()
    }

    fn release(&mut self) {
        if self.connected {
            self.connected = false;
            self.host.state.lock().unwrap().log.releases += 1;
        }
    }
}

/// One local program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Records local commands instead of running them
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RunCall>>>,
    fail_program: Option<String>,
}

impl RecordingRunner {
    pub fn failing(program: &str) -> Self {
        Self {
            fail_program: Some(program.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RunCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> DeployResult<()> {
        self.calls.lock().unwrap().push(RunCall {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });
        if self.fail_program.as_deref() == Some(program) {
            return Err(DeployError::LocalCommandFailed {
                command: program.to_string(),
                args: args.to_vec(),
                exit_code: Some(1),
            });
        }
        Ok(())
    }
}

/// Keeps every event for later assertions
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DeployEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DeployEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn stages(&self) -> Vec<DeployStage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeployEvent::StageReached { stage } => Some(stage),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DeployEvent::Warning { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl DeployEventSink for RecordingSink {
    fn on_event(&self, event: DeployEvent) {
        self.events.lock().unwrap().push(event);
    }
}
