use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn state_where_honors_config_override() {
    let root = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_colorfield"))
        .env("COLORFIELD_CONFIG_DIR", root.path())
        .args(["state", "where"])
        .output()
        .expect("failed to run colorfield state where");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim().ends_with("state.toml"));
    assert!(stdout.contains(root.path().to_str().unwrap()));
}

#[test]
fn state_reset_removes_the_saved_color() {
    let root = TempDir::new().unwrap();
    let state_file = root.path().join("state.toml");
    fs::write(&state_file, "bgHue = \"210\"\nbgSaturation = \"40\"\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_colorfield"))
        .env("COLORFIELD_CONFIG_DIR", root.path())
        .args(["state", "reset"])
        .status()
        .expect("failed to run colorfield state reset");

    assert!(status.success());
    assert!(!state_file.exists());

    let second = Command::new(env!("CARGO_BIN_EXE_colorfield"))
        .env("COLORFIELD_CONFIG_DIR", root.path())
        .args(["state", "reset"])
        .status()
        .expect("failed to rerun colorfield state reset");
    assert!(second.success());
}
