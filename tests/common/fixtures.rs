//! Test fixtures: config files, projects and a pinned clock.

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use front_deploy::domain::value_objects::DeployTimestamp;
use front_deploy::DeployUseCase;
use tempfile::TempDir;

use super::fakes::{FakeConnector, FakeHost, RecordingRunner};

/// Linux target with the default build command
pub const LINUX_CONFIG: &str = r#"
REMOTE_HOST = "web01.example.com"
REMOTE_USER = "deploy"
REMOTE_PASSWORD = "hunter2"
REMOTE_DIR = "/srv/www/shop"
REMOTE_BACKDIR = "/srv/backup/shop"
REMOTE_DISTNAME = "dist"
LOCAL_TAR_FILE = "dist.tar.gz"
"#;

/// Windows target; TOML literal strings keep the backslashes
pub const WINDOWS_CONFIG: &str = r#"
REMOTE_HOST = "win01.example.com"
REMOTE_USER = "Administrator"
REMOTE_PASSWORD = "hunter2"
REMOTE_DIR = 'D:\www\shop'
REMOTE_BACKDIR = 'D:\backup\shop'
REMOTE_DISTNAME = "dist"
LOCAL_TAR_FILE = "dist.tar.gz"
"#;

/// Timestamp every fixture run reports
pub const FIXED_TIMESTAMP: &str = "2024-03-09_14-05-07";

pub fn fixed_clock() -> DeployTimestamp {
    DeployTimestamp::from_datetime(&Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap())
}

/// Project directory with `deploy.toml` and a ready archive
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new(config: &str) -> Self {
        let project = Self::without_config();
        project.write("deploy.toml", config);
        project
    }

    /// Archive only, no `deploy.toml`
    pub fn without_config() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dist.tar.gz"), b"\x1f\x8b fake archive").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}

/// Use case wired to fakes, with an empty environment and the fixed clock
pub fn fake_use_case(
    runner: &RecordingRunner,
    host: &FakeHost,
) -> DeployUseCase<RecordingRunner, FakeConnector> {
    DeployUseCase::new(runner.clone(), host.connector())
        .with_env(|_| None)
        .with_clock(fixed_clock)
}
