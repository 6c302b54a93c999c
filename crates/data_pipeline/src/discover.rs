use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Files in `dir` accepted by `keep`, plus those one directory level down
/// when `include_subdirs` is set. Sorted. A missing directory is an empty
/// result, not an error.
pub fn discover_files(dir: &Path, include_subdirs: bool, keep: fn(&Path) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!("Input directory {} not found; nothing to parse", dir.display());
        return Vec::new();
    };

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && keep(&path) {
            files.push(path);
        } else if include_subdirs && path.is_dir() {
            if let Ok(inner) = fs::read_dir(&path) {
                files.extend(
                    inner
                        .flatten()
                        .map(|e| e.path())
                        .filter(|p| p.is_file() && keep(p)),
                );
            }
        }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_csv(p: &Path) -> bool {
        p.extension().and_then(|e| e.to_str()) == Some("csv")
    }

    #[test]
    fn test_discovers_one_level_of_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("asha/deeper")).unwrap();
        fs::write(root.join("b.csv"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("asha/a.csv"), "").unwrap();
        fs::write(root.join("asha/deeper/z.csv"), "").unwrap();

        let found = discover_files(root, true, is_csv);
        assert_eq!(found, vec![root.join("asha/a.csv"), root.join("b.csv")]);

        let flat = discover_files(root, false, is_csv);
        assert_eq!(flat, vec![root.join("b.csv")]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_files(&dir.path().join("nope"), true, is_csv).is_empty());
    }
}
