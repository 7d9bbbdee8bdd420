use std::process::Command;

fn snake_autopilot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_snake-autopilot"))
}

#[test]
fn help_lists_session_flags() {
    let output = snake_autopilot()
        .arg("--help")
        .output()
        .expect("failed to invoke snake-autopilot --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--config",
        "--output",
        "--seed",
        "--ticks-per-second",
        "--tail-policy",
        "--food-policy",
        "--verbose",
    ] {
        assert!(help.contains(flag), "help output is missing {flag}");
    }
}

#[test]
fn zero_tick_rate_fails_before_opening_window() {
    let output = snake_autopilot()
        .args(["--ticks-per-second", "0"])
        .output()
        .expect("failed to invoke snake-autopilot");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ticks per second must be positive"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn missing_config_file_is_reported() {
    let output = snake_autopilot()
        .args(["--config", "definitely-missing-snake-settings.toml"])
        .output()
        .expect("failed to invoke snake-autopilot");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to read settings"),
        "unexpected stderr: {stderr}"
    );
}
