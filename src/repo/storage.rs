//! Filesystem storage backend for Depot.
//!
//! All operations take absolute paths already resolved under the
//! repository root. Tree, search and stats walk the hierarchy with an
//! explicit work queue: depth is bounded and directory symlinks are
//! never followed, so a walk is always finite.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use super::stats::RepositoryStats;
use crate::{DepotError, Result};

/// Maximum directory depth a walk will descend.
pub const MAX_WALK_DEPTH: usize = 64;

/// Nested directory listing: an entry maps to `null` for a file and
/// to its own listing for a directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Directory with its children keyed by name.
    Directory(BTreeMap<String, TreeNode>),
    /// File, serialized as `null`.
    File,
}

impl TreeNode {
    /// Create an empty directory node.
    pub fn empty_dir() -> Self {
        TreeNode::Directory(BTreeMap::new())
    }
}

/// One entry produced by a walk.
#[derive(Debug)]
struct WalkEntry {
    /// Path relative to the walk root, slash-separated.
    rel: String,
    /// Entry base name.
    name: String,
    /// True for directories.
    is_dir: bool,
    /// True for regular files (false for directories and symlinks).
    is_file: bool,
    /// File size in bytes (0 for non-files).
    size: u64,
}

/// Storage backend bound to the repository root directory.
#[derive(Debug, Clone)]
pub struct StorageBackend {
    root: PathBuf,
}

impl StorageBackend {
    /// Create a new StorageBackend rooted at the given directory.
    ///
    /// The root directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Get the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Express a path relative to the root for error messages.
    fn display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }

    /// Write bytes to a file, creating parent directories as needed.
    ///
    /// An existing target is overwritten silently; the generated-name
    /// scheme keeps this unreachable from the upload path.
    pub fn write(&self, path: &Path, content: &[u8]) -> Result<u64> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;

        Ok(content.len() as u64)
    }

    /// Create a directory, including intermediate directories.
    /// Idempotent.
    pub fn mkdir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    /// Rename an item. Fails with `NotFound` if the source is absent
    /// and `AlreadyExists` if the destination is occupied.
    pub fn rename(&self, old: &Path, new: &Path) -> Result<()> {
        if !old.exists() {
            return Err(DepotError::NotFound(self.display(old)));
        }
        if new.exists() {
            return Err(DepotError::AlreadyExists(self.display(new)));
        }

        fs::rename(old, new)?;

        Ok(())
    }

    /// Relocate a file or subtree into `target_dir`, preserving its
    /// base name.
    pub fn move_item(&self, path: &Path, target_dir: &Path) -> Result<()> {
        if !path.exists() {
            return Err(DepotError::NotFound(self.display(path)));
        }
        if !target_dir.is_dir() {
            return Err(DepotError::NotFound(self.display(target_dir)));
        }

        let name = path
            .file_name()
            .ok_or_else(|| DepotError::InvalidPath(self.display(path)))?;
        let dest = target_dir.join(name);
        if dest.exists() {
            return Err(DepotError::AlreadyExists(self.display(&dest)));
        }

        fs::rename(path, dest)?;

        Ok(())
    }

    /// Delete a file, or a directory with all of its contents.
    pub fn delete(&self, path: &Path) -> Result<()> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DepotError::NotFound(self.display(path)));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(path)?;
        } else {
            fs::remove_file(path)?;
        }

        Ok(())
    }

    /// Walk the whole tree breadth-first with an explicit work queue.
    ///
    /// Concurrent mutations elsewhere in the tree are tolerated: a
    /// directory that disappears mid-walk is skipped, and the result
    /// is a best-effort snapshot rather than a consistent one.
    fn walk(&self) -> Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        let mut queue: VecDeque<(PathBuf, String, usize)> = VecDeque::new();
        queue.push_back((self.root.clone(), String::new(), 0));

        while let Some((dir, prefix, depth)) = queue.pop_front() {
            let read = match fs::read_dir(&dir) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            for entry in read {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let rel = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };

                // file_type() does not follow symlinks, so a symlinked
                // directory is recorded as a plain entry and never
                // descended into.
                let file_type = entry.file_type()?;
                if file_type.is_dir() {
                    if depth + 1 < MAX_WALK_DEPTH {
                        queue.push_back((entry.path(), rel.clone(), depth + 1));
                    } else {
                        warn!("walk depth limit reached at {rel}, not descending");
                    }
                    entries.push(WalkEntry {
                        rel,
                        name,
                        is_dir: true,
                        is_file: false,
                        size: 0,
                    });
                } else {
                    let is_file = file_type.is_file();
                    let size = if is_file {
                        entry.metadata().map(|m| m.len()).unwrap_or(0)
                    } else {
                        0
                    };
                    entries.push(WalkEntry {
                        rel,
                        name,
                        is_dir: false,
                        is_file,
                        size,
                    });
                }
            }
        }

        Ok(entries)
    }

    /// Produce the nested listing of the whole tree.
    pub fn tree(&self) -> Result<TreeNode> {
        let mut root = BTreeMap::new();

        for entry in self.walk()? {
            let node = if entry.is_dir {
                TreeNode::empty_dir()
            } else {
                TreeNode::File
            };
            insert_node(&mut root, &entry.rel, node);
        }

        Ok(TreeNode::Directory(root))
    }

    /// Find every entry (file or directory) whose base name contains
    /// `term` as a literal, case-sensitive substring. Results are
    /// root-relative paths in traversal order.
    pub fn search(&self, term: &str) -> Result<Vec<String>> {
        Ok(self
            .walk()?
            .into_iter()
            .filter(|e| e.name.contains(term))
            .map(|e| e.rel)
            .collect())
    }

    /// Aggregate counts and sizes over all files in the tree.
    pub fn stats(&self) -> Result<RepositoryStats> {
        let mut stats = RepositoryStats::default();

        for entry in self.walk()? {
            if entry.is_file {
                stats.record(&entry.name, entry.size);
            }
        }

        Ok(stats)
    }
}

/// Insert a node at a slash-separated relative path, creating
/// intermediate directory nodes as needed.
fn insert_node(tree: &mut BTreeMap<String, TreeNode>, rel: &str, node: TreeNode) {
    let mut current = tree;
    let mut parts = rel.split('/').peekable();

    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            // A directory already populated by its own children must
            // not be clobbered by its listing entry.
            current.entry(part.to_string()).or_insert(node);
            return;
        }

        current = match current
            .entry(part.to_string())
            .or_insert_with(TreeNode::empty_dir)
        {
            TreeNode::Directory(children) => children,
            TreeNode::File => return,
        };
    }
}
