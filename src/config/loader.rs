//! Configuration loading and environment overrides

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

use super::types::DeployConfig;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";

/// Keys recognized in the config file and the environment
pub const CONFIG_KEYS: &[&str] = &[
    "REMOTE_HOST",
    "REMOTE_USER",
    "REMOTE_PASSWORD",
    "PRIVATE_KEY",
    "PASSPHRASE",
    "REMOTE_PORT",
    "LOCAL_TAR_FILE",
    "REMOTE_DISTNAME",
    "REMOTE_DIR",
    "REMOTE_BACKDIR",
    "BUILD_COMMAND",
    "REMOTE_CODEPAGE",
    "LOCAL_SCRIPT",
];

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
///
/// Fails with [`DeployError::ConfigMissing`] when the file is absent or
/// cannot be read (a directory, no permission). No value is validated.
pub fn load_with_warnings(path: &Path) -> DeployResult<(DeployConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|_| DeployError::ConfigMissing {
        path: path.to_path_buf(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: DeployConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::ConfigInvalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment overrides; variables use the same names as the file keys.
///
/// Empty variables are ignored. A `REMOTE_PORT` that is not a port number
/// leaves the file value in place.
pub fn with_env_overrides(
    mut config: DeployConfig,
    get_env: impl Fn(&str) -> Option<String>,
) -> DeployConfig {
    let get = |key: &str| get_env(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("REMOTE_HOST") {
        config.remote_host = v;
    }
    if let Some(v) = get("REMOTE_USER") {
        config.remote_user = v;
    }
    if let Some(v) = get("REMOTE_PASSWORD") {
        config.remote_password = Some(v);
    }
    if let Some(v) = get("PRIVATE_KEY") {
        config.private_key = Some(PathBuf::from(v));
    }
    if let Some(v) = get("PASSPHRASE") {
        config.passphrase = Some(v);
    }
    if let Some(port) = get("REMOTE_PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
        config.remote_port = port;
    }
    if let Some(v) = get("LOCAL_TAR_FILE") {
        config.local_tar_file = v;
    }
    if let Some(v) = get("REMOTE_DISTNAME") {
        config.remote_distname = v;
    }
    if let Some(v) = get("REMOTE_DIR") {
        config.remote_dir = v;
    }
    if let Some(v) = get("REMOTE_BACKDIR") {
        config.remote_backdir = v;
    }
    if let Some(v) = get("BUILD_COMMAND") {
        config.build_command = v.split_whitespace().map(str::to_string).collect();
    }
    if let Some(v) = get("REMOTE_CODEPAGE") {
        config.remote_codepage = v;
    }
    if let Some(v) = get("LOCAL_SCRIPT") {
        config.local_script = Some(PathBuf::from(v));
    }

    config
}

/// Expand a leading `~` against the local home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let p = path.to_string_lossy();
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };
    if p == "~" {
        home
    } else if let Some(rest) = p.strip_prefix("~/") {
        home.join(rest)
    } else {
        path.to_path_buf()
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    let upper = unknown.to_uppercase();
    let mut best: Option<(&str, usize)> = None;
    for candidate in CONFIG_KEYS {
        let dist = levenshtein(&upper, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
