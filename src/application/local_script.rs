//! Local deploy script resolution
//!
//! Lookup order:
//! 1. `LOCAL_SCRIPT` from the config (relative paths are resolved against
//!    the project root)
//! 2. `remote-deploy.sh` / `remote-deploy.cmd` in the project root
//! 3. The script bundled with this binary, written to a temporary file

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{expand_home, DeployConfig};
use crate::domain::value_objects::{OsClass, OsProfile};
use crate::error::{DeployError, DeployResult};

const BUNDLED_POSIX: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/remote-deploy.sh"
));
const BUNDLED_WINDOWS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/remote-deploy.cmd"
));

/// Deploy script to upload, kept alive for the whole run
#[derive(Debug)]
pub enum LocalScript {
    /// A script file in the project
    File(PathBuf),
    /// The bundled default, materialized to a temp file removed on drop
    Bundled(NamedTempFile),
}

impl LocalScript {
    pub fn path(&self) -> &Path {
        match self {
            LocalScript::File(path) => path,
            LocalScript::Bundled(file) => file.path(),
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, LocalScript::Bundled(_))
    }

    /// Read the script bytes for hashing
    pub fn read(&self) -> DeployResult<Vec<u8>> {
        std::fs::read(self.path()).map_err(|e| DeployError::ScriptUnavailable {
            reason: format!("{}: {}", self.path().display(), e),
        })
    }
}

/// Content of the bundled script for `os`.
///
/// The Windows script always uses CRLF line endings, whatever the checkout did.
pub fn bundled_script(os: OsClass) -> String {
    match os {
        OsClass::Posix => BUNDLED_POSIX.replace("\r\n", "\n"),
        OsClass::Windows => BUNDLED_WINDOWS
            .lines()
            .map(|line| format!("{line}\r\n"))
            .collect(),
    }
}

/// Pick the local script to upload for the detected OS.
pub fn resolve_local_script(
    config: &DeployConfig,
    project_root: &Path,
    profile: &OsProfile,
) -> DeployResult<LocalScript> {
    if let Some(configured) = config
        .local_script
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
    {
        let path = project_root.join(expand_home(configured));
        if !path.is_file() {
            return Err(DeployError::ScriptUnavailable {
                reason: format!("LOCAL_SCRIPT {} is not a file", path.display()),
            });
        }
        return Ok(LocalScript::File(path));
    }

    let in_project = project_root.join(profile.script_name());
    if in_project.is_file() {
        return Ok(LocalScript::File(in_project));
    }

    materialize_bundled(profile)
}

fn materialize_bundled(profile: &OsProfile) -> DeployResult<LocalScript> {
    let unavailable = |e: std::io::Error| DeployError::ScriptUnavailable {
        reason: format!("cannot write bundled {}: {}", profile.script_name(), e),
    };
    let suffix = match profile.class() {
        OsClass::Posix => ".sh",
        OsClass::Windows => ".cmd",
    };

    let mut file = tempfile::Builder::new()
        .prefix("front-deploy-")
        .suffix(suffix)
        .tempfile()
        .map_err(unavailable)?;
    file.write_all(bundled_script(profile.class()).as_bytes())
        .map_err(unavailable)?;
    file.flush().map_err(unavailable)?;
    Ok(LocalScript::Bundled(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn posix() -> OsProfile {
        OsProfile::new(OsClass::Posix)
    }

    #[test]
    fn configured_script_wins() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("custom.sh"), "echo custom").unwrap();
        std::fs::write(dir.path().join("remote-deploy.sh"), "echo project").unwrap();
        let config = DeployConfig {
            local_script: Some(PathBuf::from("custom.sh")),
            ..Default::default()
        };

        let script = resolve_local_script(&config, dir.path(), &posix()).unwrap();
        assert_eq!(script.path(), dir.path().join("custom.sh"));
        assert!(!script.is_bundled());
    }

    #[test]
    fn missing_configured_script_is_an_error() {
        let dir = tempdir().unwrap();
        let config = DeployConfig {
            local_script: Some(PathBuf::from("nope.sh")),
            ..Default::default()
        };
        let err = resolve_local_script(&config, dir.path(), &posix()).unwrap_err();
        assert!(matches!(err, DeployError::ScriptUnavailable { .. }));
    }

    #[test]
    fn project_script_matches_os() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("remote-deploy.sh"), "echo sh").unwrap();
        std::fs::write(dir.path().join("remote-deploy.cmd"), "echo cmd").unwrap();
        let config = DeployConfig::default();

        let sh = resolve_local_script(&config, dir.path(), &posix()).unwrap();
        assert_eq!(sh.read().unwrap(), b"echo sh");

        let cmd =
            resolve_local_script(&config, dir.path(), &OsProfile::new(OsClass::Windows)).unwrap();
        assert_eq!(cmd.read().unwrap(), b"echo cmd");
    }

    #[test]
    fn falls_back_to_bundled_script() {
        let dir = tempdir().unwrap();
        let script = resolve_local_script(&DeployConfig::default(), dir.path(), &posix()).unwrap();

        assert!(script.is_bundled());
        let content = String::from_utf8(script.read().unwrap()).unwrap();
        assert!(content.starts_with("#!/usr/bin/env bash"));
        assert_eq!(script.path().extension().unwrap(), "sh");
    }

    #[test]
    fn bundled_temp_file_removed_on_drop() {
        let dir = tempdir().unwrap();
        let script = resolve_local_script(&DeployConfig::default(), dir.path(), &posix()).unwrap();
        let path = script.path().to_path_buf();
        assert!(path.exists());
        drop(script);
        assert!(!path.exists());
    }

    #[test]
    fn bundled_windows_script_uses_crlf() {
        let content = bundled_script(OsClass::Windows);
        assert!(content.starts_with("@echo off\r\n"));
        assert!(!content.replace("\r\n", "").contains('\n'));
    }
}
