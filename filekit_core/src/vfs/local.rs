use filekit_common::{DirEntrySnapshot, EntryMetadata, Vfs, VfsError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local filesystem VFS implementation
#[derive(Debug, Clone, Copy)]
pub struct LocalVfs;

impl LocalVfs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalVfs {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error(path: &Path, err: std::io::Error) -> VfsError {
    match err.kind() {
        ErrorKind::NotFound => VfsError::NotFound(path.display().to_string()),
        ErrorKind::PermissionDenied => VfsError::PermissionDenied(path.display().to_string()),
        _ => VfsError::Io(err),
    }
}

/// Classify a failed `read_dir` call. Older toolchains have no `NotADirectory` error
/// kind, so a path that still stats as a non-directory is reported as one.
fn listing_error(path: &Path, err: std::io::Error) -> VfsError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => io_error(path, err),
        _ => match fs::metadata(path) {
            Ok(meta) if !meta.is_dir() => VfsError::NotADirectory(path.display().to_string()),
            _ => io_error(path, err),
        },
    }
}

impl Vfs for LocalVfs {
    fn metadata(&self, path: &Path) -> Result<EntryMetadata, VfsError> {
        let meta = fs::metadata(path).map_err(|e| io_error(path, e))?;

        Ok(EntryMetadata {
            modified: meta.modified().map_err(|e| io_error(path, e))?,
            is_dir: meta.is_dir(),
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntrySnapshot>, VfsError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| listing_error(path, e))? {
            let entry = entry.map_err(|e| io_error(path, e))?;
            let entry_path = entry.path();

            // The entry's own type: a symlink to a directory is not a directory here
            let file_type = entry.file_type().map_err(|e| io_error(&entry_path, e))?;
            let meta = entry.metadata().map_err(|e| io_error(&entry_path, e))?;
            let modified = meta.modified().map_err(|e| io_error(&entry_path, e))?;

            entries.push(DirEntrySnapshot::new(
                entry.file_name(),
                modified,
                file_type.is_dir(),
            ));
        }

        Ok(entries)
    }

    /// Relative paths are anchored at the current working directory
    fn absolute(&self, path: &Path) -> Result<PathBuf, VfsError> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(joined.components().collect())
    }
}
