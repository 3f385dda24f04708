//! Deploy Request
//!
//! Inputs for one deploy run.

use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// Config file to load (`deploy.toml` by default)
    pub config_path: PathBuf,
    /// Directory the build and archive commands run in
    pub project_root: PathBuf,
    /// `--nobuild`: skip the build command, still archive and deploy
    pub skip_build: bool,
}

impl DeployRequest {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            config_path: project_root.join(DEFAULT_CONFIG_FILE),
            project_root,
            skip_build: false,
        }
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.config_path = if path.is_absolute() {
            path
        } else {
            self.project_root.join(path)
        };
        self
    }

    pub fn with_skip_build(mut self, skip: bool) -> Self {
        self.skip_build = skip;
        self
    }
}
