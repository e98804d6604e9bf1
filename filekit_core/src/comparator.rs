use crate::vfs::LocalVfs;
use chrono::{DateTime, Local};
use filekit_common::{ComparisonError, ComparisonResult, DirEntrySnapshot, Vfs, VfsError};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Largest modification time difference still treated as equal (inclusive)
pub const MOD_TIME_TOLERANCE: Duration = Duration::from_secs(2);

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TYPE_MISMATCH_SUFFIX: &str = " (type mismatch)";

/// Recursive comparator for two directory trees
///
/// Walks both roots in lock-step, one directory level at a time, and records entries
/// present on one side only, entries whose kind differs, and files whose modification
/// times differ by more than [`MOD_TIME_TOLERANCE`]. Contents are never read.
pub struct TreeComparator {
    vfs: Arc<dyn Vfs>,
    parallel: bool,
    sort_output: bool,
}

/// A subdirectory present on both sides, queued for a parallel branch
struct PendingBranch {
    first: PathBuf,
    second: PathBuf,
    relative: PathBuf,
}

impl TreeComparator {
    pub fn new(vfs: Arc<dyn Vfs>) -> Self {
        Self {
            vfs,
            parallel: false,
            sort_output: false,
        }
    }

    /// Comparator over the local filesystem
    pub fn local() -> Self {
        Self::new(Arc::new(LocalVfs::new()))
    }

    /// Compare sibling subdirectories on the rayon pool
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sort the diff sequences once the walk completes
    pub fn with_sorted_output(mut self, enabled: bool) -> Self {
        self.sort_output = enabled;
        self
    }

    /// Compare two directory trees
    ///
    /// Either the full result is returned or the first error encountered; a failure at
    /// any depth discards everything gathered so far.
    pub fn compare(
        &self,
        first_root: &Path,
        second_root: &Path,
    ) -> Result<ComparisonResult, ComparisonError> {
        let first = self.resolve_root(first_root)?;
        let second = self.resolve_root(second_root)?;

        info!(
            "Comparing {} with {} ({})",
            first.display(),
            second.display(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let mut result = ComparisonResult::new();
        self.compare_level(&first, &second, Path::new(""), &mut result)?;

        if self.sort_output {
            result.sort();
        }
        result.finalize();

        info!(
            "Compared {} files and {} directories, {} differences",
            result.total_files,
            result.total_dirs,
            result.difference_count()
        );
        Ok(result)
    }

    fn resolve_root(&self, root: &Path) -> Result<PathBuf, ComparisonError> {
        let absolute = self
            .vfs
            .absolute(root)
            .map_err(|source| ComparisonError::DirectoryReadError {
                path: root.to_path_buf(),
                source,
            })?;

        // Only a root that is truly absent is "not found"; anything else is a read failure
        match self.vfs.metadata(&absolute) {
            Ok(_) => Ok(absolute),
            Err(VfsError::NotFound(_)) => Err(ComparisonError::PathNotFound(absolute)),
            Err(source) => Err(ComparisonError::DirectoryReadError {
                path: absolute,
                source,
            }),
        }
    }

    fn list(&self, dir: &Path) -> Result<Vec<DirEntrySnapshot>, ComparisonError> {
        self.vfs
            .read_dir(dir)
            .map_err(|source| ComparisonError::DirectoryReadError {
                path: dir.to_path_buf(),
                source,
            })
    }

    /// Reconcile one directory level and descend into shared subdirectories
    fn compare_level(
        &self,
        first_dir: &Path,
        second_dir: &Path,
        relative: &Path,
        acc: &mut ComparisonResult,
    ) -> Result<(), ComparisonError> {
        let first_entries = self.list(first_dir)?;
        let second_entries = self.list(second_dir)?;

        debug!(
            "Level {:?}: {} vs {} entries",
            relative,
            first_entries.len(),
            second_entries.len()
        );

        // Totals only ever come from the first tree's listings
        for entry in &first_entries {
            if entry.is_dir {
                acc.total_dirs += 1;
            } else {
                acc.total_files += 1;
            }
        }

        let first_names: HashSet<&OsStr> =
            first_entries.iter().map(|e| e.name.as_os_str()).collect();
        let second_lookup: HashMap<&OsStr, &DirEntrySnapshot> = second_entries
            .iter()
            .map(|e| (e.name.as_os_str(), e))
            .collect();

        let mut pending = Vec::new();

        for entry in &first_entries {
            let entry_relative = relative.join(&entry.name);

            let Some(other) = second_lookup.get(entry.name.as_os_str()) else {
                acc.only_in_first.push(display_path(&entry_relative));
                continue;
            };

            if entry.is_dir != other.is_dir {
                let label = format!("{}{}", display_path(&entry_relative), TYPE_MISMATCH_SUFFIX);
                acc.only_in_first.push(label.clone());
                acc.only_in_second.push(label);
                continue;
            }

            if !entry.is_dir {
                if !mod_times_equal(entry.modified, other.modified) {
                    acc.mismatched_mod_times.push(format!(
                        "{} (dir1: {}, dir2: {})",
                        display_path(&entry_relative),
                        format_timestamp(entry.modified),
                        format_timestamp(other.modified)
                    ));
                }
                continue;
            }

            let first_child = self.vfs.join(first_dir, &entry.name);
            let second_child = self.vfs.join(second_dir, &entry.name);

            if self.parallel {
                pending.push(PendingBranch {
                    first: first_child,
                    second: second_child,
                    relative: entry_relative,
                });
            } else {
                self.compare_level(&first_child, &second_child, &entry_relative, acc)?;
            }
        }

        for entry in &second_entries {
            if !first_names.contains(entry.name.as_os_str()) {
                acc.only_in_second.push(display_path(&relative.join(&entry.name)));
            }
        }

        if !pending.is_empty() {
            let branches = pending
                .par_iter()
                .map(|branch| -> Result<ComparisonResult, ComparisonError> {
                    let mut local = ComparisonResult::new();
                    self.compare_level(&branch.first, &branch.second, &branch.relative, &mut local)?;
                    Ok(local)
                })
                .collect::<Result<Vec<_>, _>>()?;

            for branch in branches {
                acc.merge(branch);
            }
        }

        Ok(())
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Equal when the absolute difference is within [`MOD_TIME_TOLERANCE`]
pub fn mod_times_equal(first: SystemTime, second: SystemTime) -> bool {
    let diff = match first.duration_since(second) {
        Ok(diff) => diff,
        Err(err) => err.duration(),
    };
    diff <= MOD_TIME_TOLERANCE
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(TIMESTAMP_FORMAT).to_string()
}
