//! Console Event Sink
//!
//! Renders deploy events as progress lines. Warnings and remote stderr go
//! to stderr; `--verbose` adds command lines, probe output and hashes.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use front_deploy::config::ConfigWarning;
use front_deploy::domain::ports::{DeployEvent, DeployEventSink, ScriptSyncState};
use front_deploy::domain::value_objects::DeployStage;

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Which stream a rendered line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

pub struct ConsoleEventSink {
    ui: UiContext,
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdio(ui: UiContext) -> Self {
        Self::with_writers(ui, io::stdout(), io::stderr())
    }

    pub fn with_writers<O, E>(ui: UiContext, out: O, err: E) -> Self
    where
        O: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        Self {
            ui,
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }

    fn icon(&self, icon: Icon) -> String {
        icon.colored(self.ui.color, self.ui.unicode)
    }

    fn dim(&self, text: impl Into<String>) -> String {
        ColoredText::dim(text).render(self.ui.color)
    }

    fn detail(&self, text: impl AsRef<str>) -> String {
        format!("  {} {}", self.icon(Icon::Arrow), self.dim(text.as_ref()))
    }

    /// Lines to print for `event`, in order
    pub fn render(&self, event: &DeployEvent) -> Vec<(Stream, String)> {
        let verbose = self.ui.verbose;
        let mut lines = Vec::new();

        match event {
            DeployEvent::StageReached { stage } => {
                if verbose >= 2 {
                    lines.push((Stream::Out, self.detail(format!("stage: {stage}"))));
                }
            }
            DeployEvent::ConfigWarning(warning) => {
                lines.extend(
                    render_config_warning(warning, self.ui.color, self.ui.unicode)
                        .into_iter()
                        .map(|l| (Stream::Err, l)),
                );
            }
            DeployEvent::StepSkipped { stage, reason } => {
                let what = match stage {
                    DeployStage::Built => "Build",
                    other => other.label(),
                };
                lines.push((
                    Stream::Out,
                    format!(
                        "{} {} skipped {}",
                        self.icon(Icon::Skipped),
                        what,
                        self.dim(format!("({reason})"))
                    ),
                ));
            }
            DeployEvent::LocalCommandStarted { program, args } => {
                let mut command = program.clone();
                for arg in args {
                    command.push(' ');
                    command.push_str(arg);
                }
                lines.push((
                    Stream::Out,
                    format!("{} Running {}", self.icon(Icon::Progress), command),
                ));
            }
            DeployEvent::Connected { host, port, user } => {
                lines.push((
                    Stream::Out,
                    format!(
                        "{} Connected to {}@{}:{}",
                        self.icon(Icon::Remote),
                        user,
                        host,
                        port
                    ),
                ));
            }
            DeployEvent::OsProbe {
                command,
                stdout,
                stderr,
            } => {
                if verbose >= 1 {
                    lines.push((
                        Stream::Out,
                        self.detail(format!(
                            "{command}: stdout={:?} stderr={:?}",
                            stdout, stderr
                        )),
                    ));
                }
            }
            DeployEvent::OsDetected { os, fallback } => {
                let suffix = if *fallback { " (assumed)" } else { "" };
                lines.push((
                    Stream::Out,
                    format!("{} Remote OS: {}{}", self.icon(Icon::Success), os, suffix),
                ));
            }
            DeployEvent::Uploaded { local, remote } => {
                lines.push((
                    Stream::Out,
                    format!(
                        "{} Uploaded {} to {}",
                        self.icon(Icon::Success),
                        file_name(local),
                        remote
                    ),
                ));
            }
            DeployEvent::ScriptResolved { local, bundled } => {
                if verbose >= 1 {
                    let source = if *bundled {
                        "bundled default".to_string()
                    } else {
                        local.display().to_string()
                    };
                    lines.push((Stream::Out, self.detail(format!("deploy script: {source}"))));
                }
            }
            DeployEvent::ScriptChecked {
                remote,
                state,
                local_hash,
                remote_hash,
            } => {
                if *state == ScriptSyncState::Matching {
                    lines.push((
                        Stream::Out,
                        format!(
                            "{} {} unchanged, upload skipped",
                            self.icon(Icon::Skipped),
                            remote
                        ),
                    ));
                }
                if verbose >= 1 {
                    let remote_hash = remote_hash
                        .as_ref()
                        .map(|h| h.short().to_string())
                        .unwrap_or_else(|| "-".to_string());
                    lines.push((
                        Stream::Out,
                        self.detail(format!(
                            "script hash local={} remote={}",
                            local_hash.short(),
                            remote_hash
                        )),
                    ));
                }
            }
            DeployEvent::RemoteCommand { command_line } => {
                if verbose >= 1 {
                    lines.push((Stream::Out, self.detail(format!("$ {command_line}"))));
                }
            }
            DeployEvent::RemoteOutput { stdout, stderr } => {
                lines.extend(
                    stdout
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| (Stream::Out, format!("  {l}"))),
                );
                lines.extend(
                    stderr
                        .lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| (Stream::Err, format!("  {}", ColoredText::warning(l).render(self.ui.color)))),
                );
            }
            DeployEvent::Warning { message } => {
                lines.push((
                    Stream::Err,
                    format!(
                        "{} {}",
                        self.icon(Icon::Warning),
                        ColoredText::warning(message.as_str()).render(self.ui.color)
                    ),
                ));
            }
            DeployEvent::SessionReleased => {
                if verbose >= 1 {
                    lines.push((Stream::Out, self.detail("session closed")));
                }
            }
            DeployEvent::Failed { stage, .. } => {
                if verbose >= 1 {
                    lines.push((Stream::Err, self.detail(format!("failed after stage: {stage}"))));
                }
            }
            DeployEvent::Completed { .. } => {}
        }

        lines
    }

    fn write(&self, stream: Stream, line: &str) {
        let target = match stream {
            Stream::Out => &self.out,
            Stream::Err => &self.err,
        };
        if let Ok(mut writer) = target.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        for (stream, line) in self.render(&event) {
            self.write(stream, &line);
        }
    }
}

/// "Unknown config key" lines with an optional suggestion
pub fn render_config_warning(
    warning: &ConfigWarning,
    supports_color: bool,
    supports_unicode: bool,
) -> Vec<String> {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    let mut lines = vec![format!(
        "{} Unknown config key '{}' in {}",
        Icon::Warning.colored(supports_color, supports_unicode),
        warning.key,
        location
    )];
    if let Some(suggestion) = &warning.suggestion {
        lines.push(format!("   Did you mean '{}'?", suggestion));
    }
    lines
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
