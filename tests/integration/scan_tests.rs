use dupeprune::config::EngineConfig;
use dupeprune::engine::index_tree;
use dupeprune::scanner::{hash_files, HashRunConfig, Hasher, Walker, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_index_tree_groups_by_content() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"hello");
    write(dir.path(), "sub/b.txt", b"hello");
    write(dir.path(), "sub/deeper/c.txt", b"world");

    let tree = index_tree(dir.path(), &EngineConfig::default()).unwrap();

    assert_eq!(tree.files_scanned, 3);
    assert_eq!(tree.index.file_count(), 3);
    assert_eq!(tree.index.len(), 2);
    assert_eq!(tree.index.duplicate_group_count(), 1);
    assert!(tree.scan_errors.is_empty());
    assert!(tree.hash_errors.is_empty());
}

#[test]
fn test_skip_dirs_excluded_from_index() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep/a.txt", b"same");
    write(dir.path(), "node_modules/a.txt", b"same");
    write(dir.path(), "x/node_modules/b.txt", b"same");

    let config = EngineConfig::default().with_skip_dirs(["node_modules"]);
    let tree = index_tree(dir.path(), &config).unwrap();

    assert_eq!(tree.files_scanned, 1);
    assert_eq!(tree.index.duplicate_group_count(), 0);
}

#[test]
fn test_zero_length_files_group_together() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");

    let tree = index_tree(dir.path(), &EngineConfig::default()).unwrap();
    assert_eq!(tree.index.duplicate_group_count(), 1);
}

#[test]
fn test_files_across_chunk_boundary() {
    let dir = TempDir::new().unwrap();
    let mut content = vec![b'x'; dupeprune::scanner::READ_CHUNK_SIZE + 1];
    write(dir.path(), "one.bin", &content);
    write(dir.path(), "two.bin", &content);
    content[dupeprune::scanner::READ_CHUNK_SIZE] = b'y';
    write(dir.path(), "three.bin", &content);

    let tree = index_tree(dir.path(), &EngineConfig::default()).unwrap();

    assert_eq!(tree.index.len(), 2);
    assert_eq!(tree.index.duplicate_group_count(), 1);
}

#[test]
fn test_walk_then_hash_matches_single_file_hash() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "f.txt", b"payload");

    let walker = Walker::new(dir.path(), WalkerConfig::default());
    let (paths, errors) = walker.collect_files();
    assert!(errors.is_empty());

    let outcome = hash_files(paths, &HashRunConfig::default().with_workers(2));
    let expected = Hasher::new().hash_bytes(b"payload");
    assert_eq!(outcome.records[0].digest, expected);
}
