use dupeprune::actions::PruneConfig;
use dupeprune::engine::prune_empty;
use dupeprune::error::EngineError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_nested_empty_chain() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("empty1/empty2")).unwrap();

    let mut out = Vec::new();
    let report = prune_empty(&root, &PruneConfig::default(), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("empty2"));
    assert!(lines[1].ends_with("empty1"));
    assert!(root.exists());
    assert!(report.errors.is_empty());
    assert_eq!(report.summary_lines(), vec!["Done. Removed 2 empty folders."]);
}

#[test]
fn test_root_with_opt_in() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("empty1/empty2")).unwrap();

    let config = PruneConfig::default().with_include_root(true);
    let mut out = Vec::new();
    let report = prune_empty(&root, &config, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(report.dirs_removed, 3);
    assert_eq!(
        text.lines().last(),
        Some(format!("removed {}", root.display()).as_str())
    );
    assert!(!root.exists());
}

#[test]
fn test_cascade_to_fixpoint() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("A/B/C")).unwrap();
    fs::create_dir_all(root.join("A/B2")).unwrap();
    fs::create_dir_all(root.join("Z")).unwrap();
    fs::write(root.join("Z/keep.txt"), "x").unwrap();

    let mut out = Vec::new();
    let report = prune_empty(root, &PruneConfig::default(), &mut out).unwrap();

    assert_eq!(report.dirs_removed, 4);
    assert!(!root.join("A").exists());
    assert!(root.join("Z/keep.txt").exists());

    let mut out = Vec::new();
    let again = prune_empty(root, &PruneConfig::default(), &mut out).unwrap();
    assert_eq!(again.dirs_removed, 0);
}

#[test]
fn test_dry_run_same_as_real() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("A/B/C")).unwrap();
    fs::create_dir_all(root.join("A/D/E")).unwrap();

    let config = PruneConfig::default().with_dry_run(true);
    let mut dry_out = Vec::new();
    let dry = prune_empty(root, &config, &mut dry_out).unwrap();
    assert!(root.join("A/B/C").exists());

    let mut real_out = Vec::new();
    let real = prune_empty(root, &PruneConfig::default(), &mut real_out).unwrap();

    assert_eq!(dry.dirs_removed, real.dirs_removed);
    let dry_text = String::from_utf8(dry_out).unwrap();
    let real_text = String::from_utf8(real_out).unwrap();
    assert_eq!(
        dry_text.replace("[dry-run] remove ", ""),
        real_text.replace("removed ", "")
    );
}

#[test]
fn test_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f");
    fs::write(&file, "x").unwrap();

    let mut out = Vec::new();
    let err = prune_empty(&file, &PruneConfig::default(), &mut out).unwrap_err();
    assert!(matches!(err, EngineError::NotADirectory(_)));
}
