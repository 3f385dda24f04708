//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DeployResult;

use super::loader::{self, ConfigWarning};

/// Deployment configuration, loaded once per run.
///
/// Keys mirror the environment variables that override them
/// (`REMOTE_HOST`, `REMOTE_USER`, ...). Lower-case spellings are accepted
/// in the file as well. Every key has a default: missing values are not
/// validated here and surface later as connect or command failures.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    #[serde(rename = "REMOTE_HOST", alias = "remote_host")]
    pub remote_host: String,

    #[serde(rename = "REMOTE_USER", alias = "remote_user")]
    pub remote_user: String,

    #[serde(rename = "REMOTE_PASSWORD", alias = "remote_password")]
    pub remote_password: Option<String>,

    #[serde(rename = "PRIVATE_KEY", alias = "private_key")]
    pub private_key: Option<PathBuf>,

    #[serde(rename = "PASSPHRASE", alias = "passphrase")]
    pub passphrase: Option<String>,

    #[serde(rename = "REMOTE_PORT", alias = "remote_port")]
    pub remote_port: u16,

    #[serde(rename = "LOCAL_TAR_FILE", alias = "local_tar_file")]
    pub local_tar_file: String,

    #[serde(rename = "REMOTE_DISTNAME", alias = "remote_distname")]
    pub remote_distname: String,

    #[serde(rename = "REMOTE_DIR", alias = "remote_dir")]
    pub remote_dir: String,

    #[serde(rename = "REMOTE_BACKDIR", alias = "remote_backdir")]
    pub remote_backdir: String,

    #[serde(rename = "BUILD_COMMAND", alias = "build_command")]
    pub build_command: Vec<String>,

    /// Code page used to decode Windows console output
    #[serde(rename = "REMOTE_CODEPAGE", alias = "remote_codepage")]
    pub remote_codepage: String,

    /// Explicit local deploy script, overriding project/bundled lookup
    #[serde(rename = "LOCAL_SCRIPT", alias = "local_script")]
    pub local_script: Option<PathBuf>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            remote_host: String::new(),
            remote_user: String::new(),
            remote_password: None,
            private_key: None,
            passphrase: None,
            remote_port: DEFAULT_PORT,
            local_tar_file: "dist.tar.gz".to_string(),
            remote_distname: "dist".to_string(),
            remote_dir: String::new(),
            remote_backdir: String::new(),
            build_command: default_build_command(),
            remote_codepage: "gbk".to_string(),
            local_script: None,
        }
    }
}

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

pub(crate) fn default_build_command() -> Vec<String> {
    ["npm", "run", "build"].iter().map(|s| s.to_string()).collect()
}

/// One way of authenticating against the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Private key file with optional passphrase
    KeyFile {
        path: PathBuf,
        passphrase: Option<String>,
    },
    /// Plain password
    Password(String),
    /// Keys held by the local ssh-agent
    Agent,
}

impl DeployConfig {
    /// Load configuration from a TOML file, discarding warnings
    pub fn load(path: &Path) -> DeployResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Authentication methods to try, in order.
    ///
    /// A configured key comes first, then the password. The agent is used
    /// only when neither is configured.
    pub fn auth_methods(&self) -> Vec<Auth> {
        let mut methods = Vec::new();
        if let Some(key) = self.private_key.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            methods.push(Auth::KeyFile {
                path: loader::expand_home(key),
                passphrase: self.passphrase.clone().filter(|p| !p.is_empty()),
            });
        }
        if let Some(password) = self.remote_password.as_ref().filter(|p| !p.is_empty()) {
            methods.push(Auth::Password(password.clone()));
        }
        if methods.is_empty() {
            methods.push(Auth::Agent);
        }
        methods
    }

    /// `host:port` as used for the TCP connection
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.remote_host, self.remote_port)
    }

    /// File name of the local archive, as placed under `REMOTE_DIR`
    pub fn archive_file_name(&self) -> String {
        Path::new(&self.local_tar_file)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.local_tar_file.clone())
    }
}
