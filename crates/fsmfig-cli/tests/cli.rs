//! End-to-end tests for the fsm-figure and fsm-export binaries

use std::process::{Command, Output};

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env("FSMFIG_LOG_LEVEL", "off")
        .env("NO_COLOR", "1")
        .env_remove("FSMFIG_DOT")
        .output()
        .expect("failed to run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_figure_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        env!("CARGO_BIN_EXE_fsm-figure"),
        &["--output-dir", dir.path().to_str().unwrap()],
    );

    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("FSM diagram generated: "));
    let pdf = std::fs::read(dir.path().join("matching_fsm.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
}

#[test]
fn test_figure_defaults_to_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_fsm-figure"))
        .current_dir(dir.path())
        .env("FSMFIG_LOG_LEVEL", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "FSM diagram generated: matching_fsm.pdf\n");
    assert!(dir.path().join("matching_fsm.pdf").exists());
}

#[test]
fn test_export_with_missing_graphviz_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dot");
    let output = run(
        env!("CARGO_BIN_EXE_fsm-export"),
        &[
            "--output-dir",
            dir.path().to_str().unwrap(),
            "--dot-program",
            missing.to_str().unwrap(),
        ],
    );

    assert!(output.status.success(), "{:?}", output);
    let text = stdout(&output);
    assert!(text.starts_with(
        "Generating Matching Algorithm FSM diagrams (split into 3 focused machines)..."
    ));
    for name in ["matching_fsm.pdf", "request_fsm.pdf", "viewing_fsm.pdf"] {
        let line = format!("Error generating {}: ", dir.path().join(name).display());
        assert!(text.contains(&line), "missing {} in {}", line, text);
    }
    assert_eq!(text.matches("PNG generation also failed: ").count(), 3);
    assert!(text.trim_end().ends_with("FSM diagram generation complete!"));
}

#[test]
fn test_export_dot_only_writes_three_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        env!("CARGO_BIN_EXE_fsm-export"),
        &["--dot-only", "--output-dir", dir.path().to_str().unwrap()],
    );

    assert!(output.status.success(), "{:?}", output);
    for name in ["matching_fsm.dot", "request_fsm.dot", "viewing_fsm.dot"] {
        let dot = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(dot.starts_with("digraph"));
    }
    assert_eq!(stdout(&output).matches("Generated: ").count(), 3);
}

#[test]
fn test_export_list_json() {
    let output = run(env!("CARGO_BIN_EXE_fsm-export"), &["--list", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[1]["title"], "Request FSM");
}

#[test]
fn test_export_rejects_unknown_color() {
    let output = run(env!("CARGO_BIN_EXE_fsm-export"), &["--color", "sometimes"]);
    assert!(!output.status.success());
}
