//! Tests that run the `fidx` binary itself.
//!
//! Run with:
//! ```bash
//! cargo test --test cli
//! ```

use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(20);

/// A working directory whose `fidx.toml` indexes the directory itself.
fn workdir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let config = format!("[index]\nroot = {:?}\n", dir.path().display().to_string());
    fs::write(dir.path().join("fidx.toml"), config).unwrap();
    dir
}

/// Run `fidx` in `cwd`, killing it if it is still running after [`TIMEOUT`].
fn run(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fidx"));
    command
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("FILE_INDEXER_PORT")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        command.env(key, value);
    }

    let mut child = command.spawn().unwrap();
    let deadline = Instant::now() + TIMEOUT;
    while child.try_wait().unwrap().is_none() {
        if Instant::now() > deadline {
            child.kill().unwrap();
            let output = child.wait_with_output().unwrap();
            panic!(
                "fidx {args:?} still running after {TIMEOUT:?}\nstderr: {}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
        thread::sleep(Duration::from_millis(50));
    }
    child.wait_with_output().unwrap()
}

fn assert_rejects_port_zero(output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("port cannot be 0"), "stderr: {stderr}");
}

#[test]
fn test_serve_reads_port_from_env() {
    let dir = workdir();
    let output = run(dir.path(), &["serve"], &[("FILE_INDEXER_PORT", "0")]);
    assert_rejects_port_zero(&output);
}

#[test]
fn test_bare_invocation_reads_port_from_env() {
    let dir = workdir();
    let output = run(dir.path(), &[], &[("FILE_INDEXER_PORT", "0")]);
    assert_rejects_port_zero(&output);
}

#[test]
fn test_bare_invocation_accepts_global_config() {
    let dir = workdir();
    let config = dir.path().join("other.toml");
    fs::write(
        &config,
        format!(
            "[index]\nroot = {:?}\n[server]\nport = 0\n",
            dir.path().display().to_string()
        ),
    )
    .unwrap();

    let output = run(dir.path(), &["--config", "other.toml"], &[]);
    assert_rejects_port_zero(&output);
}

#[test]
fn test_stats_on_empty_index() {
    let dir = workdir();
    let output = run(dir.path(), &["stats", "--json"], &[]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total_files"], 0);
}
