//! Source tree enumeration.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// OS clutter never treated as a source file.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// How far below a directory to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Direct children only (`dir/*`)
    Shallow,
    /// Whole subtree (`dir/**/*`)
    Recursive,
}

/// Collect files under `dir`, sorted by path. A missing `dir` yields nothing.
pub fn collect_files(dir: &Path, depth: Depth) -> Vec<PathBuf> {
    let max_depth = match depth {
        Depth::Shallow => 1,
        Depth::Recursive => usize::MAX,
    };

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Direct subdirectories of `dir`, sorted by path.
pub fn collect_dirs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Check the extension against a list, case-insensitively.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| ext.eq_ignore_ascii_case(x)))
}

/// File name as UTF-8, or empty.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in ["b.js", "a.js", "sub/c.js", "sub/deep/d.js", ".DS_Store"] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    #[test]
    fn test_collect_shallow_sorted() {
        let dir = tree();
        let files = collect_files(dir.path(), Depth::Shallow);
        let names: Vec<_> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_collect_recursive() {
        let dir = tree();
        let files = collect_files(dir.path(), Depth::Recursive);
        assert_eq!(files.len(), 4);
        assert!(files.contains(&dir.path().join("sub/deep/d.js")));
    }

    #[test]
    fn test_collect_missing_dir() {
        assert!(collect_files(Path::new("/no/such/dir"), Depth::Recursive).is_empty());
        assert!(collect_dirs(Path::new("/no/such/dir")).is_empty());
    }

    #[test]
    fn test_collect_dirs() {
        let dir = tree();
        assert_eq!(collect_dirs(dir.path()), vec![dir.path().join("sub")]);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.SCSS"), &["scss", "sass"]));
        assert!(has_extension(Path::new("a.sass"), &["scss", "sass"]));
        assert!(!has_extension(Path::new("a.css"), &["scss", "sass"]));
        assert!(!has_extension(Path::new("Makefile"), &["scss"]));
    }
}
