#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Smoke tests that drive the `parkour-server` binary end to end.

use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn parkour(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_parkour-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to execute parkour-server")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

const FAST_AUTH: &str = "auth:\n  bcrypt_cost: 4\n";

#[test]
fn help_lists_subcommands() {
    let out = parkour(&["--help"]);
    assert!(out.status.success());
    let text = stdout(&out);
    for needle in [
        "Usage:",
        "run",
        "check",
        "init-db",
        "seed-datasets",
        "deactivate-user",
        "activate-user",
        "--config",
        "--mock",
    ] {
        assert!(text.contains(needle), "help output lacks {needle}: {text}");
    }
}

#[test]
fn version_prints_binary_name() {
    let out = parkour(&["--version"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("parkour-server"));
}

#[test]
fn check_accepts_valid_config() {
    let cfg = config_file("server:\n  bind_addr: \"127.0.0.1:5055\"\n");
    let out = parkour(&["--config", cfg.path().to_str().unwrap(), "check"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("Configuration is valid"));
}

#[test]
fn check_rejects_unknown_keys() {
    let cfg = config_file("servr:\n  bind_addr: \"127.0.0.1:5055\"\n");
    let out = parkour(&["--config", cfg.path().to_str().unwrap(), "check"]);
    assert!(!out.status.success());
}

#[test]
fn check_rejects_wildcard_cors_with_credentials() {
    let cfg = config_file("cors:\n  allowed_origins: [\"*\"]\n  allow_credentials: true\n");
    let out = parkour(&["--config", cfg.path().to_str().unwrap(), "check"]);
    assert!(!out.status.success());
}

#[test]
fn missing_config_file_fails() {
    let out = parkour(&["--config", "/nonexistent/parkour.yaml", "check"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("does not exist"));
}

#[test]
fn print_config_applies_layers_and_redacts_secret() {
    let cfg = config_file("auth:\n  jwt_secret: \"file-secret-value\"\n");
    let out = Command::new(env!("CARGO_BIN_EXE_parkour-server"))
        .args(["--config", cfg.path().to_str().unwrap(), "--port", "6123", "--print-config"])
        .env("APP__LOGGING__LEVEL", "warn")
        .output()
        .unwrap();
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("0.0.0.0:6123"), "{text}");
    assert!(text.contains("warn"), "{text}");
    assert!(!text.contains("file-secret-value"), "{text}");
}

#[test]
fn init_db_creates_admin() {
    let cfg = config_file(FAST_AUTH);
    let out = parkour(&["--mock", "--config", cfg.path().to_str().unwrap(), "init-db"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("Admin user created"));
    assert!(text.contains("Database initialized"));
}

#[test]
fn init_db_is_idempotent_on_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let dsn = format!("sqlite://{}?mode=rwc", dir.path().join("parkour.db").display());
    let cfg = config_file(&format!("{FAST_AUTH}database:\n  dsn: \"{dsn}\"\n"));
    let path = cfg.path().to_str().unwrap();

    let first = parkour(&["--config", path, "init-db"]);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    assert!(stdout(&first).contains("Admin user created"));

    let second = parkour(&["--config", path, "init-db"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("Admin user already exists"));

    let off = parkour(&["--config", path, "deactivate-user", "admin"]);
    assert!(off.status.success());
    assert!(stdout(&off).contains("User 'admin' deactivated"));

    let on = parkour(&["--config", path, "activate-user", "admin"]);
    assert!(on.status.success());
    assert!(stdout(&on).contains("User 'admin' activated"));
}

#[test]
fn seed_datasets_reports_layers() {
    let out = parkour(&["--mock", "seed-datasets"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    assert!(text.contains("Created 11 sample datasets"));
    assert!(text.contains("Bronze layer: 3"));
    assert!(text.contains("Silver layer: 4"));
    assert!(text.contains("Gold layer: 4"));
}

#[test]
fn deactivating_unknown_user_fails() {
    let out = parkour(&["--mock", "deactivate-user", "ghost"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("ghost"));
}

#[tokio::test]
async fn run_serves_health_until_killed() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let cfg = config_file(&format!("server:\n  bind_addr: \"127.0.0.1:{port}\"\n"));

    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_parkour-server"))
        .args(["--mock", "--config", cfg.path().to_str().unwrap(), "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .unwrap();

    let mut stream = None;
    for _ in 0..100 {
        if let Ok(s) = TcpStream::connect(("127.0.0.1", port)).await {
            stream = Some(s);
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    let mut stream = stream.expect("server did not start listening");

    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_string(&mut response))
        .await
        .unwrap()
        .unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("\"status\":\"healthy\""), "{response}");
    assert!(response.contains("\"service\":\"parkour-api\""), "{response}");

    child.kill().await.unwrap();
}
