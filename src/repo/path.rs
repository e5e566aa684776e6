//! Path resolution against the repository root.

use std::path::{Component, Path, PathBuf};

use crate::{DepotError, Result};

/// Resolves user-supplied relative paths to absolute paths under the
/// repository root, rejecting anything that would escape it.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a resolver bound to the given repository root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a slash-separated relative path to an absolute path
    /// under the root.
    ///
    /// The input may be the result of path joins (e.g.
    /// `target_dir/item_name`). `.` segments are dropped and `..`
    /// segments are folded; any input that would climb above the root,
    /// or that is absolute, fails with `InvalidPath`. Resolution is
    /// pure and succeeds whether or not the target exists.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        let mut depth: usize = 0;

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(DepotError::InvalidPath(relative.to_string()));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DepotError::InvalidPath(relative.to_string()));
                }
            }
        }

        Ok(resolved)
    }

    /// Express an absolute path under the root as a slash-separated
    /// relative path. Used to report resolved targets back to callers.
    pub fn to_relative(&self, absolute: &Path) -> String {
        absolute
            .strip_prefix(&self.root)
            .unwrap_or(absolute)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new("/srv/depot/files")
    }

    #[test]
    fn test_resolve_simple() {
        let resolved = resolver().resolve("report.pdf").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/depot/files/report.pdf"));
    }

    #[test]
    fn test_resolve_nested() {
        let resolved = resolver().resolve("docs/2024/report.pdf").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/depot/files/docs/2024/report.pdf"));
    }

    #[test]
    fn test_resolve_nonexistent_target_succeeds() {
        // Resolution is pure; creation paths rely on resolving paths
        // that do not exist yet.
        let resolved = resolver().resolve("not/yet/created").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/depot/files/not/yet/created"));
    }

    #[test]
    fn test_resolve_drops_cur_dir() {
        let resolved = resolver().resolve("./docs/./a.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/depot/files/docs/a.txt"));
    }

    #[test]
    fn test_resolve_folds_parent_dir_inside_root() {
        let resolved = resolver().resolve("docs/../archive/a.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/depot/files/archive/a.txt"));
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let result = resolver().resolve("../../etc/passwd");
        assert!(matches!(result, Err(DepotError::InvalidPath(_))));
    }

    #[test]
    fn test_resolve_rejects_escape_after_descent() {
        let result = resolver().resolve("docs/../../outside");
        assert!(matches!(result, Err(DepotError::InvalidPath(_))));
    }

    #[test]
    fn test_resolve_rejects_absolute() {
        let result = resolver().resolve("/etc/passwd");
        assert!(matches!(result, Err(DepotError::InvalidPath(_))));
    }

    #[test]
    fn test_resolve_empty_is_root() {
        let resolved = resolver().resolve("").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/depot/files"));
    }

    #[test]
    fn test_to_relative() {
        let r = resolver();
        let abs = r.resolve("docs/a.txt").unwrap();
        assert_eq!(r.to_relative(&abs), "docs/a.txt");
    }
}
