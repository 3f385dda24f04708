//! Deploy Use Case
//!
//! Orchestrates the deployment flow:
//! 1. Load the config (file, then environment overrides)
//! 2. Build and archive locally
//! 3. Connect and detect the remote OS
//! 4. Upload the archive
//! 5. Sync the deploy script by content hash
//! 6. Run the script with its five arguments
//!
//! The SSH session is held by a guard and released exactly once, on every
//! exit path. Nothing is retried.

use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::application::invoke::{invoke_script, ScriptArgs};
use crate::application::local_script::resolve_local_script;
use crate::application::os_detect::detect_os;
use crate::application::script_sync::sync_script;
use crate::config::{with_env_overrides, DeployConfig};
use crate::domain::ports::{
    CommandRunner, DeployEvent, DeployEventSink, NoopEventSink, RemoteConnector, RemoteSession,
};
use crate::domain::value_objects::{DeployStage, DeployTimestamp, OsProfile};
use crate::error::{DeployError, DeployResult};

use super::options::DeployRequest;
use super::result::DeployReport;

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Deploy use case - orchestrates one deploy run
///
/// Parameterized by its ports so tests can drive it without a network or
/// local toolchain.
pub struct DeployUseCase<R, C>
where
    R: CommandRunner,
    C: RemoteConnector,
{
    runner: R,
    connector: C,
    env: EnvLookup,
    cancel: Arc<AtomicBool>,
    clock: fn() -> DeployTimestamp,
}

impl<R, C> DeployUseCase<R, C>
where
    R: CommandRunner,
    C: RemoteConnector,
{
    pub fn new(runner: R, connector: C) -> Self {
        Self {
            runner,
            connector,
            env: Box::new(|key| std::env::var(key).ok()),
            cancel: Arc::new(AtomicBool::new(false)),
            clock: DeployTimestamp::now,
        }
    }

    /// Replace the environment used for config overrides
    pub fn with_env(mut self, get_env: impl Fn(&str) -> Option<String> + 'static) -> Self {
        self.env = Box::new(get_env);
        self
    }

    /// Share a flag that aborts the run before the next step once set
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DeployTimestamp) -> Self {
        self.clock = clock;
        self
    }

    /// Execute the deploy use case silently
    pub fn execute(&self, request: &DeployRequest) -> DeployResult<DeployReport> {
        self.execute_with_events(request, Arc::new(NoopEventSink))
    }

    /// Execute the deploy use case with event reporting
    pub fn execute_with_events(
        &self,
        request: &DeployRequest,
        event_sink: Arc<dyn DeployEventSink>,
    ) -> DeployResult<DeployReport> {
        let started = Instant::now();
        let mut progress = Progress::new(event_sink.as_ref());

        match self.run(request, &mut progress) {
            Ok(report) => {
                progress.advance(DeployStage::Done);
                event_sink.on_event(DeployEvent::Completed {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
                Ok(report)
            }
            Err(err) => {
                // A step failing because Ctrl+C also reached its process
                // counts as an interrupt.
                let err = if self.is_cancelled() {
                    DeployError::Interrupted
                } else {
                    err
                };
                event_sink.on_event(DeployEvent::Failed {
                    stage: progress.stage,
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn run(&self, request: &DeployRequest, progress: &mut Progress<'_>) -> DeployResult<DeployReport> {
        let events = progress.events;

        // Step 1: Config
        self.checkpoint()?;
        let config = self.load_config(&request.config_path, events)?;
        progress.advance(DeployStage::ConfigLoaded);

        // Step 2: Build
        self.checkpoint()?;
        if request.skip_build {
            events.on_event(DeployEvent::StepSkipped {
                stage: DeployStage::Built,
                reason: "--nobuild".to_string(),
            });
        } else if let Some((program, args)) = config.build_command.split_first() {
            self.run_local(program, args, &request.project_root, events)?;
        } else {
            events.on_event(DeployEvent::StepSkipped {
                stage: DeployStage::Built,
                reason: "BUILD_COMMAND is empty".to_string(),
            });
        }
        progress.advance(DeployStage::Built);

        // Step 3: Archive
        self.checkpoint()?;
        let tar_args = vec![
            "-czf".to_string(),
            config.local_tar_file.clone(),
            config.remote_distname.clone(),
        ];
        self.run_local("tar", &tar_args, &request.project_root, events)?;
        progress.advance(DeployStage::Archived);

        // Step 4: Connect
        self.checkpoint()?;
        let mut session = SessionGuard::new(self.connector.connect(&config)?, events);
        events.on_event(DeployEvent::Connected {
            host: config.remote_host.clone(),
            port: config.remote_port,
            user: config.remote_user.clone(),
        });
        progress.advance(DeployStage::Connected);

        // Step 5: Detect OS
        self.checkpoint()?;
        let detection = detect_os(&mut *session, events);
        let profile = OsProfile::new(detection.os).with_codepage(&config.remote_codepage);
        progress.advance(DeployStage::OsDetected);

        // Step 6: Upload archive
        self.checkpoint()?;
        let archive_local = request.project_root.join(&config.local_tar_file);
        let archive_remote = profile.join(&config.remote_dir, &config.archive_file_name());
        session.upload(&archive_local, &archive_remote)?;
        events.on_event(DeployEvent::Uploaded {
            local: archive_local,
            remote: archive_remote.clone(),
        });
        progress.advance(DeployStage::ArchiveUploaded);

        // Step 7: Sync script
        self.checkpoint()?;
        let script = resolve_local_script(&config, &request.project_root, &profile)?;
        events.on_event(DeployEvent::ScriptResolved {
            local: script.path().to_path_buf(),
            bundled: script.is_bundled(),
        });
        let script_remote = profile.join(&config.remote_dir, profile.script_name());
        let script_state = sync_script(&mut *session, &profile, &script, &script_remote, events)?;
        progress.advance(DeployStage::ScriptSynced);

        // Step 8: Execute
        self.checkpoint()?;
        let timestamp = (self.clock)();
        let args = ScriptArgs::new(&config, timestamp.clone());
        let output = invoke_script(&mut *session, &profile, &script_remote, &args, events)?;
        progress.advance(DeployStage::ScriptExecuted);

        drop(session);

        Ok(DeployReport {
            os: detection.os,
            os_fallback: detection.fallback,
            archive_remote,
            script_remote,
            script_state,
            timestamp,
            output,
        })
    }

    fn load_config(&self, path: &Path, events: &dyn DeployEventSink) -> DeployResult<DeployConfig> {
        let (config, warnings) = DeployConfig::load_with_warnings(path)?;
        for warning in warnings {
            events.on_event(DeployEvent::ConfigWarning(warning));
        }
        Ok(with_env_overrides(config, |key| (self.env)(key)))
    }

    fn run_local(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        events: &dyn DeployEventSink,
    ) -> DeployResult<()> {
        events.on_event(DeployEvent::LocalCommandStarted {
            program: program.to_string(),
            args: args.to_vec(),
        });
        self.runner.run(program, args, cwd)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    fn checkpoint(&self) -> DeployResult<()> {
        if self.is_cancelled() {
            Err(DeployError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Last stage reached, reported on each advance
struct Progress<'a> {
    stage: DeployStage,
    events: &'a dyn DeployEventSink,
}

impl<'a> Progress<'a> {
    fn new(events: &'a dyn DeployEventSink) -> Self {
        Self {
            stage: DeployStage::Idle,
            events,
        }
    }

    fn advance(&mut self, stage: DeployStage) {
        debug_assert_eq!(self.stage.next(), Some(stage));
        self.stage = stage;
        self.events.on_event(DeployEvent::StageReached { stage });
    }
}

/// Owns the session for the run and releases it when dropped
struct SessionGuard<'a, S: RemoteSession> {
    session: S,
    events: &'a dyn DeployEventSink,
}

impl<'a, S: RemoteSession> SessionGuard<'a, S> {
    fn new(session: S, events: &'a dyn DeployEventSink) -> Self {
        Self { session, events }
    }
}

impl<S: RemoteSession> Deref for SessionGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: RemoteSession> DerefMut for SessionGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: RemoteSession> Drop for SessionGuard<'_, S> {
    fn drop(&mut self) {
        self.session.release();
        self.events.on_event(DeployEvent::SessionReleased);
    }
}
