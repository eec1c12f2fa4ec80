// Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding the token fixture files
pub fn fixture_tokens() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tokens")
}

/// Temporary working directory with the fixture copied to `tokens/`
pub fn fixture_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    let tokens = dir.path().join("tokens");
    fs::create_dir_all(&tokens).unwrap();
    for entry in fs::read_dir(fixture_tokens()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), tokens.join(entry.file_name())).unwrap();
    }
    dir
}

/// Write an extra token file into a workspace
pub fn write_tokens(dir: &Path, name: &str, contents: &str) {
    let tokens = dir.join("tokens");
    fs::create_dir_all(&tokens).unwrap();
    fs::write(tokens.join(name), contents).unwrap();
}

/// Every regular file below `root`, relative and sorted, with its bytes
pub fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    collect(root, root, &mut files);
    files.sort();
    files
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_path_buf();
            out.push((relative, fs::read(&path).unwrap()));
        }
    }
}
