use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn run_op2(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_op2"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("op2 command should execute")
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn builtin_mesh_prints_and_validates() {
    let out = run_op2(&[]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("OP2 Set: cells with size 4"));
    assert!(stdout.contains("OP2 ParLoop: OP2 Kernel: assemble"));
    assert!(stdout.contains("✓ Boucle sum valide"));
    assert!(!stdout.contains("✗"));
}

#[test]
fn json_output_is_parsable() {
    let out = run_op2(&[&fixture("strip.toml"), "--json"]);
    assert!(out.status.success());
    let json: Value = serde_json::from_slice(&out.stdout).expect("stdout should be json");
    assert_eq!(json["sets"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["loops"][0]["kernel"]["name"], "res");
}

#[test]
fn validation_problems_are_reported() {
    let out = run_op2(&[&fixture("dangling.toml")]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("✗ Validation error: Map 'edge2node'"));
}

#[test]
fn load_failure_exits_non_zero() {
    let out = run_op2(&[&fixture("bad_index.toml")]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("hors de l'intervalle"));
}
