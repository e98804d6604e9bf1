use crate::{DirEntrySnapshot, EntryMetadata, VfsError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Virtual File System trait for abstracting the filesystem reads a comparison needs
///
/// The tree comparator only stats roots, lists directories and joins names onto paths, so any
/// source that can do those things (the local disk, an in-memory tree) can be
/// compared.
pub trait Vfs: Send + Sync {
    /// Returns the metadata for a specific path, following symlinks
    ///
    /// A missing path must fail with `VfsError::NotFound`; callers rely on that to
    /// tell an absent root from one they cannot reach.
    fn metadata(&self, path: &Path) -> Result<EntryMetadata, VfsError>;

    /// Lists the direct children of a directory
    ///
    /// A failure on any single entry fails the whole listing.
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntrySnapshot>, VfsError>;

    /// Joins an entry name onto a directory path
    fn join(&self, dir: &Path, name: &OsStr) -> PathBuf {
        dir.join(name)
    }

    /// Resolves a path to absolute form
    fn absolute(&self, path: &Path) -> Result<PathBuf, VfsError> {
        Ok(path.to_path_buf())
    }
}
