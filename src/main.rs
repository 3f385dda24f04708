//! front-deploy CLI - build, archive and ship a frontend over SSH
//!
//! Usage: front-deploy [--nobuild] [--config <PATH>] [--color <WHEN>] [--verbose]...
//!
//! Exit status: 0 on success, 2 on configuration errors, 130 when
//! interrupted, 1 on any other failure.

mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use front_deploy::presentation::Cli;

use crate::ui::context::UiContext;
use crate::ui::error::{exit_code, format_error};

fn main() {
    let cli = Cli::parse();
    let ui = UiContext::new(cli.verbose, cli.color);

    if let Err(err) = run(&cli, ui) {
        eprintln!("{}", format_error(&err, ui.color, ui.unicode));
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: &Cli, ui: UiContext) -> Result<()> {
    commands::deploy::cmd_deploy(&cli.config, cli.no_build, ui)
}
