use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use front_deploy::application::DeployRequest;
use front_deploy::presentation::create_deploy_use_case;

use crate::ui::context::UiContext;
use crate::ui::views::deploy::{render_deploy_header, render_deploy_summary};
use crate::ui::views::events::ConsoleEventSink;

/// Deploy command entry point
pub fn cmd_deploy(config: &Path, no_build: bool, ui: UiContext) -> Result<()> {
    let project_root = std::env::current_dir()?;
    let request = DeployRequest::new(&project_root)
        .with_config_path(config)
        .with_skip_build(no_build);

    print!(
        "{}",
        render_deploy_header(
            &request.config_path,
            &request.project_root,
            request.skip_build,
            ui.color,
            ui.unicode
        )
    );
    println!();

    let cancel = install_interrupt_handler()?;
    let use_case = create_deploy_use_case(cancel);
    let sink = Arc::new(ConsoleEventSink::stdio(ui));

    let started = Instant::now();
    let report = use_case.execute_with_events(&request, sink)?;

    println!();
    print!(
        "{}",
        render_deploy_summary(
            &report,
            started.elapsed().as_millis() as u64,
            ui.color,
            ui.unicode
        )
    );
    Ok(())
}

/// What one Ctrl+C asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Finish the current step, then clean up and release the session
    StopAfterStep,
    /// Exit at once. The session guard does not run, so the SSH connection
    /// is dropped by the OS without a disconnect message.
    AbortNow,
}

fn on_interrupt(cancel: &AtomicBool) -> Interrupt {
    if cancel.swap(true, Ordering::SeqCst) {
        Interrupt::AbortNow
    } else {
        Interrupt::StopAfterStep
    }
}

/// First Ctrl+C stops the run before its next step; a second one exits now.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    ctrlc::set_handler(move || match on_interrupt(&flag) {
        Interrupt::StopAfterStep => eprintln!(
            "\nInterrupted: stopping after the current step (Ctrl+C again to abort now, without closing the SSH session cleanly)"
        ),
        Interrupt::AbortNow => std::process::exit(130),
    })?;
    Ok(cancel)
}
