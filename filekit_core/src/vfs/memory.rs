//! In-memory VFS for synthesized directory trees
//!
//! Listings come back in lexical order, timestamps are exact, and any directory can be
//! marked unreadable. That makes it the natural source for comparisons whose inputs
//! are generated rather than read from disk.

use filekit_common::{DirEntrySnapshot, EntryMetadata, Vfs, VfsError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy)]
struct MemoryNode {
    modified: SystemTime,
    is_dir: bool,
}

/// A directory tree held entirely in memory
///
/// Paths are expected to be absolute (`/a/b.txt`). Adding an entry creates any
/// missing parent directories.
#[derive(Debug, Clone)]
pub struct MemoryVfs {
    nodes: BTreeMap<PathBuf, MemoryNode>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryVfs {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            PathBuf::from("/"),
            MemoryNode {
                modified: SystemTime::UNIX_EPOCH,
                is_dir: true,
            },
        );

        Self {
            nodes,
            unreadable: BTreeSet::new(),
        }
    }

    /// Add a file with the given modification time
    pub fn with_file(mut self, path: impl AsRef<Path>, modified: SystemTime) -> Self {
        self.insert(path.as_ref(), modified, false);
        self
    }

    /// Add a directory with the given modification time
    pub fn with_dir(mut self, path: impl AsRef<Path>, modified: SystemTime) -> Self {
        self.insert(path.as_ref(), modified, true);
        self
    }

    /// Make listing `path` fail with a permission error
    pub fn with_unreadable(mut self, path: impl AsRef<Path>) -> Self {
        self.unreadable.insert(path.as_ref().to_path_buf());
        self
    }

    fn insert(&mut self, path: &Path, modified: SystemTime, is_dir: bool) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(dir.to_path_buf()).or_insert(MemoryNode {
                modified,
                is_dir: true,
            });
            parent = dir.parent();
        }

        self.nodes.insert(path.to_path_buf(), MemoryNode { modified, is_dir });
    }
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs for MemoryVfs {
    fn metadata(&self, path: &Path) -> Result<EntryMetadata, VfsError> {
        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))?;

        Ok(EntryMetadata {
            modified: node.modified,
            is_dir: node.is_dir,
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntrySnapshot>, VfsError> {
        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))?;

        if !node.is_dir {
            return Err(VfsError::NotADirectory(path.display().to_string()));
        }
        if self.unreadable.contains(path) {
            return Err(VfsError::PermissionDenied(path.display().to_string()));
        }

        let entries = self
            .nodes
            .range(path.to_path_buf()..)
            .skip(1)
            .take_while(|(child, _)| child.starts_with(path))
            .filter(|(child, _)| child.parent() == Some(path))
            .filter_map(|(child, node)| {
                child
                    .file_name()
                    .map(|name| DirEntrySnapshot::new(name, node.modified, node.is_dir))
            })
            .collect();

        Ok(entries)
    }
}
