use std::path::PathBuf;

/// Folder scanned when no `--directory` is given.
pub const DEFAULT_DIRECTORY: &str = "./terraform";

/// Settings for one run. Built once from the command line and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub directory: PathBuf,
}

impl Config {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY)
    }
}
