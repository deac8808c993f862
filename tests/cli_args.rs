//! Integration tests for CLI argument handling
//!
//! Tests flag parsing and validation from the command line.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_airdir"))
        .args(args)
        .env_remove("AIRDIR_API_BASE_URL")
        .output()
        .expect("Failed to execute airdir")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("airdir"), "Help should mention airdir");
    assert!(stdout.contains("--mock"), "Help should mention --mock flag");
    assert!(stdout.contains("--freshness-secs"));
}

#[test]
fn test_zero_freshness_prints_error_and_exits() {
    let output = run_cli(&["--freshness-secs", "0"]);
    assert!(!output.status.success(), "Expected zero window to fail");
    assert_eq!(output.status.code(), Some(2), "Usage errors exit with status 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("freshness"),
        "Should print error message about the freshness window: {}",
        stderr
    );
}

#[test]
fn test_non_numeric_page_size_is_rejected() {
    let output = run_cli(&["--page-size", "many"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid") || stderr.contains("Invalid"));
}

#[test]
fn test_malformed_base_url_is_rejected() {
    let output = run_cli(&["--base-url", "localhost:5000"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("localhost:5000"), "stderr: {}", stderr);
}

#[test]
fn test_missing_fixture_file_fails_before_tui() {
    let output = run_cli(&["--fixtures", "/nonexistent/airports.json"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("airports.json"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use std::time::Duration;

    use airdir::cli::{Cli, DataMode, StartupConfig};
    use clap::Parser;

    #[test]
    fn test_cli_mock_and_page_size() {
        let cli = Cli::parse_from(["airdir", "--mock", "--page-size", "12"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.data_mode, DataMode::Bundled);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.freshness_window, Duration::from_secs(300));
    }

    #[test]
    fn test_cli_log_dir() {
        let cli = Cli::parse_from(["airdir", "--log-dir", "/tmp/airdir"]);
        assert_eq!(
            cli.log_dir.as_deref(),
            Some(std::path::Path::new("/tmp/airdir"))
        );
    }

    #[test]
    fn test_cli_rejects_negative_freshness() {
        assert!(Cli::try_parse_from(["airdir", "--freshness-secs", "-5"]).is_err());
    }
}
