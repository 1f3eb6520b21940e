use super::FileMatcher;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "package.json", "{}");
    write(root, "apps/web/package.json", "{}");
    write(root, "apps/web/src/main.ts", "");
    write(root, "libs/util/package.json", "{}");
    write(root, "libs/util/Dockerfile", "");
    write(root, "node_modules/left-pad/package.json", "{}");
    write(root, "apps/web/node_modules/lodash/package.json", "{}");
    write(root, ".git/config", "");
    write(root, "libs/util/dist/package.json", "{}");
    dir
}

#[test]
fn matches_nested_files() {
    let dir = fixture();
    let matcher = FileMatcher::new();

    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert_eq!(
        files,
        vec![
            "apps/web/package.json".to_string(),
            "libs/util/package.json".to_string(),
            "package.json".to_string(),
        ]
    );
}

#[test]
fn matches_root_level_file_with_recursive_pattern() {
    let dir = fixture();
    let matcher = FileMatcher::new();

    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert!(files.contains(&"package.json".to_string()));
}

#[test]
fn skips_default_excluded_directories() {
    let dir = fixture();
    let matcher = FileMatcher::new();

    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert!(!files.iter().any(|f| f.contains("node_modules")));
    assert!(!files.iter().any(|f| f.contains("dist")));
    assert!(!files.iter().any(|f| f.contains(".git")));
}

#[test]
fn extends_excluded_directories() {
    let dir = fixture();
    write(dir.path(), "coverage/package.json", "{}");

    let matcher = FileMatcher::new();
    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert!(files.contains(&"coverage/package.json".to_string()));

    let matcher = FileMatcher::new().with_excluded_dirs(["coverage"]);
    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert!(!files.contains(&"coverage/package.json".to_string()));
}

#[test]
fn star_does_not_cross_separators() {
    let dir = fixture();
    let matcher = FileMatcher::new();

    let files = matcher.match_files(dir.path(), "apps/*/package.json").unwrap();
    assert_eq!(files, vec!["apps/web/package.json".to_string()]);

    // A single star never matches into nested directories.
    let files = matcher.match_files(dir.path(), "*/package.json").unwrap();
    assert!(files.is_empty());
}

#[test]
fn matches_literal_file_names() {
    let dir = fixture();
    let matcher = FileMatcher::new();

    let files = matcher.match_files(dir.path(), "**/Dockerfile").unwrap();
    assert_eq!(files, vec!["libs/util/Dockerfile".to_string()]);
}

#[test]
fn only_regular_files_are_returned() {
    let dir = fixture();
    fs::create_dir_all(dir.path().join("apps/package.json")).unwrap();

    let matcher = FileMatcher::new();
    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert!(!files.contains(&"apps/package.json".to_string()));
}

#[test]
fn rejects_missing_root() {
    let matcher = FileMatcher::new();
    let result = matcher.match_files(Path::new("/definitely/not/here"), "**/*");
    assert!(result.is_err());
}

#[test]
fn rejects_invalid_pattern() {
    let dir = fixture();
    let matcher = FileMatcher::new();
    let result = matcher.match_files(dir.path(), "**/[");
    assert!(result.is_err());
}

#[cfg(unix)]
#[test]
fn does_not_follow_symlinks() {
    let dir = fixture();
    let outside = TempDir::new().unwrap();
    write(outside.path(), "escaped/package.json", "{}");
    std::os::unix::fs::symlink(outside.path().join("escaped"), dir.path().join("linked")).unwrap();

    let matcher = FileMatcher::new();
    let files = matcher.match_files(dir.path(), "**/package.json").unwrap();
    assert!(!files.iter().any(|f| f.starts_with("linked")));
}
