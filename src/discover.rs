use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ScanError;

/// Suffix a file name must carry to be scanned.
pub const EXTENSION: &str = ".tf";

/// A terraform file found under the scanned root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    pub path: PathBuf,
}

/// Collects every `.tf` file below `root`, descending into subdirectories.
///
/// The result is sorted by path so reports are stable, but callers should not
/// rely on any particular order. Entries that can't be read while walking are
/// logged and skipped; only a missing root is an error.
pub fn discover(root: &Path) -> Result<Vec<SourceFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_terraform_file(entry.path()) {
            debug!(path = %entry.path().display(), "found terraform file");
            files.push(SourceFile {
                path: entry.into_path(),
            });
        }
    }
    files.sort();
    Ok(files)
}

fn is_terraform_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(EXTENSION))
        .is_some_and(|stem| !stem.is_empty() && !stem.contains(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_nested_tf_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("modules/ecs")).unwrap();
        fs::write(dir.path().join("main.tf"), "").unwrap();
        fs::write(dir.path().join("modules/ecs/task.tf"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();
        fs::write(dir.path().join("state.tfstate"), "").unwrap();

        let found = discover(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("main.tf"), PathBuf::from("modules/ecs/task.tf")]
        );
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_directory_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover(&missing),
            Err(ScanError::DirectoryNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn file_as_root_is_directory_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.tf");
        fs::write(&file, "").unwrap();
        assert!(matches!(discover(&file), Err(ScanError::DirectoryNotFound(_))));
    }

    #[test]
    fn bare_extension_is_not_a_terraform_file() {
        assert!(!is_terraform_file(Path::new(".tf")));
        assert!(is_terraform_file(Path::new("vars.tf")));
        assert!(!is_terraform_file(Path::new("vars.tf.json")));
    }
}
