use front_deploy::DeployError;

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// One-line error with a red marker, plus a hint for known failures
pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}",
        Icon::Error.colored(supports_color, supports_unicode),
        ColoredText::error(err.to_string()).render(supports_color)
    );

    if let Some(hint) = err.downcast_ref::<DeployError>().and_then(hint) {
        out.push('\n');
        out.push_str(&format!(
            "  {} {}",
            Icon::Arrow.colored(supports_color, supports_unicode),
            ColoredText::dim(hint).render(supports_color)
        ));
    }
    out
}

/// Process exit status for `err`; 1 when it is not a deploy error
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<DeployError>()
        .map(DeployError::exit_code)
        .unwrap_or(1)
}

fn hint(err: &DeployError) -> Option<&'static str> {
    match err {
        DeployError::ConnectFailed { .. } => {
            Some("check REMOTE_HOST, REMOTE_PORT and the credentials in the config")
        }
        DeployError::RemoteScriptFailed { .. } => {
            Some("the script output above shows where it stopped")
        }
        DeployError::LocalCommandError { .. } => Some("is the program installed and on PATH?"),
        _ => None,
    }
}
