use std::path::Path;

use front_deploy::application::DeployReport;
use front_deploy::domain::ports::ScriptSyncState;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::summary::ResultSummary;
use crate::ui::primitives::icon::Icon;

pub fn render_deploy_header(
    config_path: &Path,
    project_root: &Path,
    skip_build: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Deploy, "front-deploy");
    header.add("Project", project_root.display().to_string());
    header.add("Config", config_path.display().to_string());
    if skip_build {
        header.add("Mode", "--nobuild (build skipped)");
    }
    header.render(supports_color, supports_unicode)
}

pub fn render_deploy_summary(
    report: &DeployReport,
    elapsed_ms: u64,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = ResultSummary::success("Deploy Complete");

    let os = if report.os_fallback {
        format!("{} (assumed)", report.os)
    } else {
        report.os.to_string()
    };
    summary.add_fact("Remote OS", os);
    summary.add_fact("Archive", report.archive_remote.as_str());
    summary.add_fact(
        "Script",
        format!(
            "{} ({})",
            report.script_remote,
            script_state_label(report.script_state)
        ),
    );
    summary.add_fact("Timestamp", report.timestamp.as_str());
    summary.add_fact("Elapsed", format!("{:.1}s", elapsed_ms as f64 / 1000.0));

    if report.os_fallback {
        summary.add_warning("Remote OS was guessed; check the host if the script misbehaved");
    }
    if !report.output.stderr.trim().is_empty() {
        summary.add_warning("Deploy script wrote to stderr");
    }

    summary.render(supports_color, supports_unicode)
}

fn script_state_label(state: ScriptSyncState) -> &'static str {
    match state {
        ScriptSyncState::Absent => "uploaded, was missing",
        ScriptSyncState::Stale => "updated",
        ScriptSyncState::Matching => "unchanged",
    }
}
