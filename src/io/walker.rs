use crate::errors::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const GO_EXTENSION: &str = ".go";
const TEST_SUFFIX: &str = "_test.go";

/// Ordered walk over the Go files under a root directory.
///
/// Entries are visited depth-first in file-name order, so repeated walks of
/// an unchanged tree yield the same sequence.
pub struct GoFileWalker {
    root: PathBuf,
    include_tests: bool,
    include_hidden: bool,
    excluded: Vec<PathBuf>,
}

impl GoFileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_tests: true,
            include_hidden: true,
            excluded: Vec::new(),
        }
    }

    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Skip directories whose name starts with `.` (below the root)
    pub fn with_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Skip the given directories and everything below them
    pub fn with_excluded<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.excluded.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let hidden = entry.file_name().to_string_lossy().starts_with('.');
                (self.include_hidden || !hidden) && !self.is_excluded(entry.path())
            });
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && self.should_process(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        self.excluded.iter().any(|excluded| excluded == dir)
    }

    fn should_process(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        name.ends_with(GO_EXTENSION) && (self.include_tests || !is_test_file_name(&name))
    }
}

/// Whether a file name denotes a Go test file
pub fn is_test_file_name(name: &str) -> bool {
    name.ends_with(TEST_SUFFIX)
}

pub fn is_go_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(GO_EXTENSION)
}

/// Every `.go` file under `root`, tests included, outside hidden and `excluded` directories
pub fn go_files(root: &Path, excluded: &[PathBuf]) -> Result<Vec<PathBuf>> {
    GoFileWalker::new(root)
        .with_hidden(false)
        .with_excluded(excluded.iter().cloned())
        .walk()
}

/// Non-test `.go` files under a service directory
pub fn service_files(dir: &Path) -> Result<Vec<PathBuf>> {
    GoFileWalker::new(dir).with_tests(false).walk()
}

/// Immediate subdirectories of `dir`, sorted by name
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}
