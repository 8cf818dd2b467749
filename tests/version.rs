//! Integration test: binary entry point without a terminal

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_threadlens"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(
        stdout.contains("threadlens 0.1.0"),
        "Expected version line, got: {}",
        stdout
    );
}

#[test]
fn missing_transcript_fails_before_touching_terminal() {
    let logs = std::env::temp_dir().join("threadlens_version_test");
    let config = logs.join("config.toml");
    std::fs::create_dir_all(&logs).expect("scratch dir");
    std::fs::write(
        &config,
        format!("log_file_path = {:?}\n", logs.join("run.log").display().to_string()),
    )
    .expect("config file");

    let output = Command::new(env!("CARGO_BIN_EXE_threadlens"))
        .arg("/nonexistent/threadlens/session.jsonl")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FileNotFound"), "stderr: {stderr}");
    let _ = std::fs::remove_dir_all(&logs);
}
