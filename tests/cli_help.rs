mod common;

use common::env::run_cli;

#[test]
fn help_lists_flags_and_config_source() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_cli(dir.path(), &["--help"]);

    assert!(result.success);
    for needle in ["--nobuild", "--config", "--verbose", "--color", "-v, --version"] {
        assert!(
            result.stdout.contains(needle),
            "help output should mention {needle}; got:\n{}",
            result.stdout
        );
    }
    assert!(result.stdout.contains("deploy.toml"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_cli(dir.path(), &["--no-build"]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 2);
    assert!(result.stderr.contains("--no-build"));
}
