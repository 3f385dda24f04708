//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - A single command: running the binary performs one deploy
//! - `-v` prints the version; verbosity is the long-only `--verbose`

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Build the frontend, upload it over SSH and run the remote deploy script
#[derive(Parser, Debug)]
#[command(name = "front-deploy")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(after_help = "Settings are read from deploy.toml; environment variables with the same names override them.")]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Skip the build step and deploy the existing output
    #[arg(long = "nobuild")]
    pub no_build: bool,

    /// Config file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Color output mode
    #[arg(long, value_enum)]
    pub color: Option<ColorWhen>,

    /// Show command lines, probe output and hashes (repeat for stages)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["front-deploy"]).unwrap();
        assert!(!cli.no_build);
        assert_eq!(cli.config, PathBuf::from("deploy.toml"));
        assert_eq!(cli.color, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_nobuild_and_config() {
        let cli =
            Cli::try_parse_from(["front-deploy", "--nobuild", "--config", "conf/prod.toml"])
                .unwrap();
        assert!(cli.no_build);
        assert_eq!(cli.config, PathBuf::from("conf/prod.toml"));
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["front-deploy", "--verbose", "--verbose"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn short_v_is_version() {
        let err = Cli::try_parse_from(["front-deploy", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn color_never() {
        let cli = Cli::try_parse_from(["front-deploy", "--color", "never"]).unwrap();
        assert!(matches!(cli.color, Some(ColorWhen::Never)));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["front-deploy", "--no-build"]).is_err());
    }
}
