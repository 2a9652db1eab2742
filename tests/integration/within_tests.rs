use dupeprune::config::EngineConfig;
use dupeprune::engine::dedup_within;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run(root: &Path, config: &EngineConfig) -> (dupeprune::report::RunReport, String) {
    let mut out = Vec::new();
    let report = dedup_within(root, config, &mut out).unwrap();
    (report, String::from_utf8(out).unwrap())
}

/// A tree with several overlapping duplicate groups at varied depths.
fn populate(root: &Path) {
    for i in 0..40 {
        let content = format!("content-{}", i % 7);
        let rel = match i % 4 {
            0 => format!("f{i}.txt"),
            1 => format!("a/f{i}.txt"),
            2 => format!("a/bb/f{i}.txt"),
            _ => format!("ccc/dd/eee/f{i}.txt"),
        };
        write(root, &rel, content.as_bytes());
    }
}

#[test]
fn test_keeps_shortest_path() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "a/x.txt", b"hello");
    write(root, "bb/y.txt", b"hello");

    let (report, text) = run(root, &EngineConfig::default());

    assert_eq!(
        text,
        format!(
            "removed {} (kept {})\n",
            root.join("bb/y.txt").display(),
            root.join("a/x.txt").display()
        )
    );
    assert!(root.join("a/x.txt").exists());
    assert!(!root.join("bb/y.txt").exists());
    assert_eq!(report.files_removed, 1);
    assert_eq!(report.summary_lines(), vec!["Done. Removed 1 files."]);
}

#[test]
fn test_plan_same_for_one_and_many_workers() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    let base = EngineConfig::default().with_dry_run(true);
    let (_, sequential) = run(dir.path(), &base.clone().with_workers(1));
    let (_, parallel) = run(dir.path(), &base.with_workers(8));

    assert!(!sequential.is_empty());
    assert_eq!(sequential, parallel);
}

#[test]
fn test_second_run_removes_nothing() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    let (first, _) = run(dir.path(), &EngineConfig::default().with_workers(4));
    assert_eq!(first.files_removed, 33);

    let (second, text) = run(dir.path(), &EngineConfig::default().with_workers(4));
    assert_eq!(second.files_removed, 0);
    assert_eq!(second.duplicate_groups, 0);
    assert!(text.is_empty());
}

#[test]
fn test_dry_run_matches_real_run() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    let (dry, dry_text) = run(dir.path(), &EngineConfig::default().with_dry_run(true));
    let (real, real_text) = run(dir.path(), &EngineConfig::default());

    assert_eq!(dry.files_removed, real.files_removed);
    assert_eq!(dry.bytes_freed, real.bytes_freed);

    let dry_paths: Vec<&str> = dry_text
        .lines()
        .map(|l| l.trim_start_matches("[dry-run] remove "))
        .collect();
    let real_paths: Vec<&str> = real_text
        .lines()
        .map(|l| l.trim_start_matches("removed "))
        .collect();
    assert_eq!(dry_paths, real_paths);
}

#[test]
fn test_one_copy_survives_per_group() {
    let dir = TempDir::new().unwrap();
    populate(dir.path());

    run(dir.path(), &EngineConfig::default());

    let survivors: Vec<_> = walkdir::WalkDir::new(dir.path())
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .collect();
    assert_eq!(survivors.len(), 7);
}

#[test]
fn test_skipped_dir_contents_untouched() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "x.txt", b"same");
    write(dir.path(), ".git/objects/x.txt", b"same");

    let config = EngineConfig::default().with_skip_dirs([".git"]);
    let (report, _) = run(dir.path(), &config);

    assert_eq!(report.files_removed, 0);
    assert!(dir.path().join(".git/objects/x.txt").exists());
}

#[test]
fn test_prune_keeps_empty_dirs_under_skipped_names() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".git/HEAD", b"ref: refs/heads/main");
    fs::create_dir_all(dir.path().join(".git/refs/tags")).unwrap();
    write(dir.path(), "a/x.txt", b"same");
    write(dir.path(), "bb/cc/x.txt", b"same");

    let config = EngineConfig::default()
        .with_skip_dirs([".git"])
        .with_prune_empty(true);
    let (report, text) = run(dir.path(), &config);

    assert_eq!(report.files_removed, 1);
    assert_eq!(report.prune.as_ref().map(|p| p.dirs_removed), Some(2));
    assert!(!text.contains(".git"));
    assert!(dir.path().join(".git/refs/tags").is_dir());
}

#[test]
fn test_dry_run_prune_counts_folders_emptied_by_dedup() {
    let dry_dir = TempDir::new().unwrap();
    let real_dir = TempDir::new().unwrap();
    for root in [dry_dir.path(), real_dir.path()] {
        populate(root);
    }

    let config = EngineConfig::default().with_prune_empty(true);
    let (dry, _) = run(dry_dir.path(), &config.clone().with_dry_run(true));
    let (real, _) = run(real_dir.path(), &config);

    let dry_prune = dry.prune.as_ref().map(|p| p.dirs_removed);
    assert_eq!(dry_prune, real.prune.as_ref().map(|p| p.dirs_removed));
    assert!(dry_prune.is_some_and(|n| n > 0));
}
