use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysmenu"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute sysmenu");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("system menu"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysmenu"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute sysmenu");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sysmenu"));
}

#[test]
fn run_is_hidden_from_help() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysmenu"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute sysmenu");

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reset"));
    assert!(!stdout.contains("parent-handle"));
}

#[test]
fn reset_rejects_unknown_target() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysmenu"));
    cmd.args(["reset", "everything"]);

    // Act
    let output = cmd.output().expect("failed to execute sysmenu");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("transparency"));
}
