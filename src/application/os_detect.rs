//! Remote OS detection
//!
//! Runs the POSIX probe first, then the Windows probe. A host that answers
//! neither cleanly is assumed to be Windows and a warning is emitted.

use crate::domain::ports::{DeployEvent, DeployEventSink, RawOutput, RemoteSession};
use crate::domain::value_objects::OsClass;

/// Outcome of [`detect_os`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsDetection {
    pub os: OsClass,
    /// True when neither probe was conclusive and the class is a guess
    pub fallback: bool,
}

/// Classify the remote host behind `session`.
///
/// Never fails: a probe whose execution errors counts as a failed probe.
pub fn detect_os<S>(session: &mut S, events: &dyn DeployEventSink) -> OsDetection
where
    S: RemoteSession + ?Sized,
{
    let detection = classify(session, events);
    if detection.fallback {
        events.on_event(DeployEvent::Warning {
            message: format!(
                "remote OS probe inconclusive ({} and {} gave no usable output); assuming {}",
                OsClass::Posix.probe_command(),
                OsClass::Windows.probe_command(),
                detection.os
            ),
        });
    }
    events.on_event(DeployEvent::OsDetected {
        os: detection.os,
        fallback: detection.fallback,
    });
    detection
}

fn classify<S>(session: &mut S, events: &dyn DeployEventSink) -> OsDetection
where
    S: RemoteSession + ?Sized,
{
    let posix = probe(session, OsClass::Posix, events);
    if posix.is_some_and(|out| out.has_stdout() && !out.has_stderr()) {
        return OsDetection {
            os: OsClass::Posix,
            fallback: false,
        };
    }

    let windows = probe(session, OsClass::Windows, events);
    let fallback = !windows.is_some_and(|out| out.has_stdout() || out.has_stderr());
    OsDetection {
        os: OsClass::Windows,
        fallback,
    }
}

fn probe<S>(session: &mut S, class: OsClass, events: &dyn DeployEventSink) -> Option<RawOutput>
where
    S: RemoteSession + ?Sized,
{
    let command = class.probe_command();
    match session.execute(command) {
        Ok(output) => {
            events.on_event(DeployEvent::OsProbe {
                command: command.to_string(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
            Some(output)
        }
        Err(e) => {
            events.on_event(DeployEvent::OsProbe {
                command: command.to_string(),
                stdout: String::new(),
                stderr: e.to_string(),
            });
            None
        }
    }
}
