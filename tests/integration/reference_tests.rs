use dupeprune::config::EngineConfig;
use dupeprune::engine::{dedup_against, index_tree};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_removes_target_copies_only() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref");
    let target = dir.path().join("tgt");
    write(&reference, "one.bin", &[1, 2]);
    write(&target, "copy.bin", &[1, 2]);
    write(&target, "unique.bin", &[9]);

    let mut out = Vec::new();
    let report = dedup_against(&reference, &target, &EngineConfig::default(), &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("removed {}\n", target.join("copy.bin").display())
    );
    assert!(reference.join("one.bin").exists());
    assert!(!target.join("copy.bin").exists());
    assert!(target.join("unique.bin").exists());
    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.duplicate_groups, 1);
    assert_eq!(report.bytes_freed, 2);
}

#[test]
fn test_no_shared_content_remains() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref");
    let target = dir.path().join("tgt");
    for i in 0..10 {
        write(&reference, &format!("r{i}"), format!("c{}", i % 4).as_bytes());
    }
    for i in 0..25 {
        write(&target, &format!("t/{i}"), format!("c{}", i % 6).as_bytes());
    }

    let config = EngineConfig::default().with_workers(3);
    let mut out = Vec::new();
    dedup_against(&reference, &target, &config, &mut out).unwrap();

    let reference_index = index_tree(&reference, &config).unwrap().index;
    let target_index = index_tree(&target, &config).unwrap().index;
    assert_eq!(reference_index.file_count(), 10);
    for (digest, _) in target_index.groups() {
        assert!(!reference_index.contains(digest));
    }
    // Only contents c4 and c5 survive in the target
    assert_eq!(target_index.len(), 2);
}

#[test]
fn test_duplicates_inside_target_are_all_removed() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref");
    let target = dir.path().join("tgt");
    write(&reference, "a", b"x");
    write(&target, "a", b"x");
    write(&target, "b", b"x");

    let mut out = Vec::new();
    let report = dedup_against(&reference, &target, &EngineConfig::default(), &mut out).unwrap();

    assert_eq!(report.files_removed, 2);
    assert!(reference.join("a").exists());
}

#[test]
fn test_dry_run_leaves_target_intact() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref");
    let target = dir.path().join("tgt");
    write(&reference, "a", b"x");
    write(&target, "b", b"x");

    let config = EngineConfig::default().with_dry_run(true);
    let mut out = Vec::new();
    let report = dedup_against(&reference, &target, &config, &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("[dry-run] remove {}\n", target.join("b").display())
    );
    assert_eq!(report.summary_lines(), vec!["Would remove 1 files."]);
    assert!(target.join("b").exists());
}
