use dupeprune::actions::{execute_plan, DeleteConfig};
use dupeprune::duplicates::{dedup_within_tree, ChecksumIndex};
use dupeprune::error::ExitCode;
use dupeprune::report::RunReport;
use dupeprune::scanner::{hash_files, HashError, HashRunConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_hash_failure_excluded_from_index() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&a, "same").unwrap();
    fs::write(&b, "same").unwrap();

    let paths = vec![a.clone(), dir.path().join("vanished"), b.clone()];
    let outcome = hash_files(paths, &HashRunConfig::default().with_workers(2));

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(outcome.errors[0], HashError::NotFound(_)));

    let index = ChecksumIndex::from_outcome(&outcome);
    let plan = dedup_within_tree(&index);
    assert_eq!(plan.removal_paths(), vec![b.as_path()]);
}

#[test]
fn test_removal_failures_do_not_abort_batch() {
    let dir = TempDir::new().unwrap();
    let names = ["k", "r1", "r2", "r3"];
    for name in names {
        fs::write(dir.path().join(name), "same").unwrap();
    }

    let outcome = hash_files(
        names.iter().map(|n| dir.path().join(n)).collect(),
        &HashRunConfig::default(),
    );
    let plan = dedup_within_tree(&ChecksumIndex::from_outcome(&outcome));
    assert_eq!(plan.len(), 3);

    // Swap one planned file for a directory after planning
    fs::remove_file(dir.path().join("r2")).unwrap();
    fs::create_dir(dir.path().join("r2")).unwrap();

    let mut report = RunReport::new(false);
    let mut out = Vec::new();
    execute_plan(&plan, &DeleteConfig::permanent(), &mut report, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("error: failed to remove "));
    assert_eq!(report.files_removed, 2);
    assert_eq!(report.removal_errors, 1);
    assert_eq!(report.exit_code(), ExitCode::PartialSuccess);
    assert!(dir.path().join("k").exists());
    assert!(!dir.path().join("r3").exists());
}
