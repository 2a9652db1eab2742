use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn dupeprune() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dupeprune"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_within_dry_run_output() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a")).unwrap();
    fs::create_dir_all(dir.path().join("bb")).unwrap();
    fs::write(dir.path().join("a/x.txt"), "hello").unwrap();
    fs::write(dir.path().join("bb/y.txt"), "hello").unwrap();

    let output = dupeprune()
        .args(["-q", "within", "--dry-run"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!(
                "[dry-run] remove {} (kept {})",
                dir.path().join("bb/y.txt").display(),
                dir.path().join("a/x.txt").display()
            )
            .as_str(),
            "Would remove 1 files.",
        ]
    );
    assert!(dir.path().join("bb/y.txt").exists());
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = dupeprune()
        .args(["-q", "within"])
        .arg(dir.path().join("nope"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[DP001] Error:"));
    assert!(stderr.contains("not a directory"));
}

#[test]
fn test_json_errors() {
    let dir = TempDir::new().unwrap();
    let output = dupeprune()
        .args(["-q", "--json-errors", "prune"])
        .arg(dir.path().join("nope"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    let json: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
    assert_eq!(json["code"], "DP001");
    assert_eq!(json["interrupted"], false);
}

#[test]
fn test_prune_subcommand() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("e1/e2")).unwrap();

    let output = dupeprune()
        .args(["-q", "prune"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.ends_with("Done. Removed 2 empty folders.\n"));
    assert!(!dir.path().join("e1").exists());
    assert!(dir.path().exists());
}

#[test]
fn test_against_subcommand() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref");
    let target = dir.path().join("tgt");
    fs::create_dir_all(&reference).unwrap();
    fs::create_dir_all(&target).unwrap();
    fs::write(reference.join("one.bin"), [1u8, 2]).unwrap();
    fs::write(target.join("copy.bin"), [1u8, 2]).unwrap();

    let output = dupeprune()
        .args(["-q", "against"])
        .arg(&reference)
        .arg(&target)
        .args(["--workers", "2"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with(&format!("removed {}", target.join("copy.bin").display())));
    assert!(!target.join("copy.bin").exists());
}
