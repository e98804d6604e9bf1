use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::time::SystemTime;

/// One entry read from a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntrySnapshot {
    pub name: OsString,
    pub modified: SystemTime,
    pub is_dir: bool,
}

impl DirEntrySnapshot {
    pub fn new(name: impl Into<OsString>, modified: SystemTime, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            modified,
            is_dir,
        }
    }
}

/// Metadata for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Aggregated outcome of comparing two directory trees.
///
/// Paths are relative to the compared roots. The order of each sequence follows the
/// directory listing order of the source and carries no meaning unless the comparison
/// was asked to sort its output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Set once the whole walk has finished
    pub identical: bool,
    pub only_in_first: Vec<String>,
    pub only_in_second: Vec<String>,
    /// Entries formatted as `<relpath> (dir1: <ts>, dir2: <ts>)`
    pub mismatched_mod_times: Vec<String>,
    /// Files seen while listing the first root
    pub total_files: usize,
    /// Directories seen while listing the first root
    pub total_dirs: usize,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute `identical` from the diff sequences
    pub fn finalize(&mut self) {
        self.identical = self.only_in_first.is_empty()
            && self.only_in_second.is_empty()
            && self.mismatched_mod_times.is_empty();
    }

    /// Fold a branch accumulator into this one
    pub fn merge(&mut self, other: ComparisonResult) {
        self.only_in_first.extend(other.only_in_first);
        self.only_in_second.extend(other.only_in_second);
        self.mismatched_mod_times.extend(other.mismatched_mod_times);
        self.total_files += other.total_files;
        self.total_dirs += other.total_dirs;
    }

    pub fn sort(&mut self) {
        self.only_in_first.sort();
        self.only_in_second.sort();
        self.mismatched_mod_times.sort();
    }

    pub fn difference_count(&self) -> usize {
        self.only_in_first.len() + self.only_in_second.len() + self.mismatched_mod_times.len()
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Print itemized results by default
    #[serde(default)]
    pub verbose: bool,

    /// Sort diff lists before reporting
    #[serde(default)]
    pub sort_results: bool,

    /// Compare sibling subdirectories in parallel
    #[serde(default)]
    pub parallel: bool,

    /// Never emit ANSI colors
    #[serde(default)]
    pub no_color: bool,

    /// Enable portable mode (config alongside binary)
    #[serde(default)]
    pub portable_mode: bool,
}
