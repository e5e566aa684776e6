//! Repository service: the public operation surface of Depot.
//!
//! Orchestrates the path resolver, the storage backend and the
//! metadata index, and owns the consistency invariants between them.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::path::PathResolver;
use super::stats::RepositoryStats;
use super::storage::{StorageBackend, TreeNode};
use crate::db::{NewUpload, SharedDatabase, UploadRecord, UploadRepository};
use crate::{DepotError, Result};

/// Outcome of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Generated storage name the bytes were written under.
    pub stored_name: String,
    /// Number of bytes written.
    pub size: u64,
}

/// Repository service over one root directory and one metadata index.
///
/// Both dependencies are injected at construction, so multiple
/// isolated instances can coexist in one process.
pub struct RepositoryService {
    resolver: PathResolver,
    storage: StorageBackend,
    db: SharedDatabase,
}

impl RepositoryService {
    /// Create a service rooted at the given directory, creating the
    /// root if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>, db: SharedDatabase) -> Result<Self> {
        let storage = StorageBackend::new(root)?;
        let resolver = PathResolver::new(storage.root().to_path_buf());

        Ok(Self {
            resolver,
            storage,
            db,
        })
    }

    /// Get the repository root.
    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    /// Generate a collision-resistant storage name, preserving the
    /// original extension.
    pub fn generate_stored_name(original_name: &str) -> String {
        let uuid = Uuid::new_v4();
        let ext = Path::new(original_name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("bin");
        format!("{uuid}.{ext}")
    }

    /// Mutating operations must never target the root itself.
    fn ensure_not_root(&self, resolved: &Path, relative: &str) -> Result<()> {
        if resolved == self.storage.root() {
            return Err(DepotError::InvalidPath(relative.to_string()));
        }
        Ok(())
    }

    /// Store uploaded bytes under a freshly generated name and record
    /// the upload in the metadata index.
    ///
    /// The write happens strictly before the record: an index reader
    /// never observes a stored name without a readable file behind it.
    /// If recording fails after the write, the orphaned file is removed
    /// on a best-effort basis.
    pub async fn upload(&self, original_name: &str, content: &[u8]) -> Result<UploadReceipt> {
        let stored_name = Self::generate_stored_name(original_name);
        let path = self.resolver.resolve(&stored_name)?;

        let size = self.storage.write(&path, content)?;

        let repo = UploadRepository::new(self.db.pool());
        if let Err(e) = repo.record(&NewUpload::new(original_name, &stored_name)).await {
            tracing::error!("Failed to record upload {stored_name}: {e}");
            let _ = self.storage.delete(&path);
            return Err(e);
        }

        tracing::info!("Uploaded {original_name} as {stored_name} ({size} bytes)");

        Ok(UploadReceipt { stored_name, size })
    }

    /// List all upload records, most recent first.
    ///
    /// This is the upload history as recorded; it does not verify that
    /// the referenced files still exist on disk.
    pub async fn list_uploaded(&self) -> Result<Vec<UploadRecord>> {
        UploadRepository::new(self.db.pool()).list_all().await
    }

    /// Create a directory (and intermediate directories). Idempotent.
    pub fn create_directory(&self, relative: &str) -> Result<()> {
        let path = self.resolver.resolve(relative)?;
        self.storage.mkdir(&path)
    }

    /// Find entries whose base name contains `term`.
    pub fn search(&self, term: &str) -> Result<Vec<String>> {
        self.storage.search(term)
    }

    /// Rename an item from one relative path to another.
    pub fn rename(&self, old_relative: &str, new_relative: &str) -> Result<()> {
        let old = self.resolver.resolve(old_relative)?;
        let new = self.resolver.resolve(new_relative)?;
        self.ensure_not_root(&old, old_relative)?;
        self.ensure_not_root(&new, new_relative)?;

        self.storage.rename(&old, &new)
    }

    /// Delete a file or directory (recursively).
    ///
    /// Upload records referencing deleted files are kept; see
    /// [`list_uploaded`](Self::list_uploaded).
    pub fn delete(&self, relative: &str) -> Result<()> {
        let path = self.resolver.resolve(relative)?;
        self.ensure_not_root(&path, relative)?;

        self.storage.delete(&path)
    }

    /// Move an item into a target directory, preserving its base name.
    pub fn move_item(&self, item_relative: &str, target_dir_relative: &str) -> Result<()> {
        let item = self.resolver.resolve(item_relative)?;
        let target_dir = self.resolver.resolve(target_dir_relative)?;
        self.ensure_not_root(&item, item_relative)?;

        self.storage.move_item(&item, &target_dir)
    }

    /// Produce the nested listing of the whole repository.
    pub fn tree(&self) -> Result<TreeNode> {
        self.storage.tree()
    }

    /// Aggregate statistics over all stored files.
    pub fn stats(&self) -> Result<RepositoryStats> {
        self.storage.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup_service() -> (TempDir, RepositoryService) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(Database::open_in_memory().await.unwrap());
        let service = RepositoryService::new(temp_dir.path().join("files"), db).unwrap();
        (temp_dir, service)
    }

    #[test]
    fn test_generate_stored_name_unique() {
        let name1 = RepositoryService::generate_stored_name("test.txt");
        let name2 = RepositoryService::generate_stored_name("test.txt");

        assert_ne!(name1, name2);
        assert!(name1.ends_with(".txt"));
        assert!(name2.ends_with(".txt"));
    }

    #[test]
    fn test_generate_stored_name_no_extension() {
        let name = RepositoryService::generate_stored_name("README");
        assert!(name.ends_with(".bin"));
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let (_temp_dir, service) = setup_service().await;
        let content = b"%PDF-1.4 fake";

        let receipt = service.upload("report.pdf", content).await.unwrap();

        assert!(receipt.stored_name.ends_with(".pdf"));
        assert_eq!(receipt.size, content.len() as u64);

        let records = service.list_uploaded().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stored_name, receipt.stored_name);
        assert_eq!(records[0].original_name, "report.pdf");

        let on_disk = fs::read(service.root().join(&receipt.stored_name)).unwrap();
        assert_eq!(on_disk, content);
    }

    #[tokio::test]
    async fn test_upload_collision_safety() {
        let (_temp_dir, service) = setup_service().await;

        let first = service.upload("a.txt", b"first").await.unwrap();
        let second = service.upload("a.txt", b"second").await.unwrap();

        assert_ne!(first.stored_name, second.stored_name);
        assert_eq!(
            fs::read(service.root().join(&first.stored_name)).unwrap(),
            b"first"
        );
        assert_eq!(
            fs::read(service.root().join(&second.stored_name)).unwrap(),
            b"second"
        );

        let records = service.list_uploaded().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.original_name == "a.txt"));
    }

    #[tokio::test]
    async fn test_create_directory_idempotent() {
        let (_temp_dir, service) = setup_service().await;

        service.create_directory("docs/archive").unwrap();
        let before = service.tree().unwrap();

        service.create_directory("docs/archive").unwrap();
        let after = service.tree().unwrap();

        assert_eq!(before, after);
        assert!(service.root().join("docs/archive").is_dir());
    }

    #[tokio::test]
    async fn test_rename_traversal_rejected() {
        let (_temp_dir, service) = setup_service().await;

        let result = service.rename("../../etc/passwd", "x");

        assert!(matches!(result, Err(DepotError::InvalidPath(_))));
        // No mutation
        assert!(!service.root().join("x").exists());
    }

    #[tokio::test]
    async fn test_rename() {
        let (_temp_dir, service) = setup_service().await;
        service.upload("a.txt", b"data").await.unwrap();
        let stored = service.list_uploaded().await.unwrap()[0].stored_name.clone();

        service.rename(&stored, "renamed.txt").unwrap();

        assert!(service.root().join("renamed.txt").exists());
        assert!(!service.root().join(&stored).exists());
    }

    #[tokio::test]
    async fn test_rename_missing_source() {
        let (_temp_dir, service) = setup_service().await;

        let result = service.rename("missing.txt", "x.txt");

        assert!(matches!(result, Err(DepotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let (_temp_dir, service) = setup_service().await;

        let result = service.delete("does-not-exist");

        assert!(matches!(result, Err(DepotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_keeps_upload_history() {
        let (_temp_dir, service) = setup_service().await;
        let receipt = service.upload("a.txt", b"data").await.unwrap();

        service.delete(&receipt.stored_name).unwrap();

        assert!(!service.root().join(&receipt.stored_name).exists());
        // The index is an upload history, not a live inventory
        let records = service.list_uploaded().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_root_rejected() {
        let (_temp_dir, service) = setup_service().await;

        let result = service.delete("");

        assert!(matches!(result, Err(DepotError::InvalidPath(_))));
        assert!(service.root().exists());
    }

    #[tokio::test]
    async fn test_move_then_search() {
        let (_temp_dir, service) = setup_service().await;
        service
            .storage
            .write(&service.root().join("a.txt"), b"data")
            .unwrap();
        service.create_directory("sub").unwrap();

        service.move_item("a.txt", "sub").unwrap();

        let matches = service.search("a.txt").unwrap();
        assert_eq!(matches, vec!["sub/a.txt"]);
    }

    #[tokio::test]
    async fn test_move_missing_item() {
        let (_temp_dir, service) = setup_service().await;
        service.create_directory("sub").unwrap();

        let result = service.move_item("missing.txt", "sub");

        assert!(matches!(result, Err(DepotError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_move_collision() {
        let (_temp_dir, service) = setup_service().await;
        service
            .storage
            .write(&service.root().join("a.txt"), b"top")
            .unwrap();
        service
            .storage
            .write(&service.root().join("sub/a.txt"), b"sub")
            .unwrap();

        let result = service.move_item("a.txt", "sub");

        assert!(matches!(result, Err(DepotError::AlreadyExists(_))));
        assert_eq!(fs::read(service.root().join("sub/a.txt")).unwrap(), b"sub");
    }

    #[tokio::test]
    async fn test_tree_shape() {
        let (_temp_dir, service) = setup_service().await;
        service
            .storage
            .write(&service.root().join("dir1/file1.txt"), b"x")
            .unwrap();
        service.create_directory("dir2").unwrap();

        let json = serde_json::to_value(service.tree().unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"dir1": {"file1.txt": null}, "dir2": {}})
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let (_temp_dir, service) = setup_service().await;
        service.upload("photo.jpg", &[0u8; 100]).await.unwrap();
        service.upload("report.pdf", &[0u8; 200]).await.unwrap();
        service.upload("data.xyz", &[0u8; 50]).await.unwrap();

        let stats = service.stats().unwrap();

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 350);
        assert_eq!(stats.image_files, 1);
        assert_eq!(stats.pdf_files, 1);
    }

    #[tokio::test]
    async fn test_two_isolated_instances() {
        let temp_dir = TempDir::new().unwrap();
        let db_a = Arc::new(Database::open_in_memory().await.unwrap());
        let db_b = Arc::new(Database::open_in_memory().await.unwrap());
        let a = RepositoryService::new(temp_dir.path().join("a"), db_a).unwrap();
        let b = RepositoryService::new(temp_dir.path().join("b"), db_b).unwrap();

        a.upload("only-in-a.txt", b"x").await.unwrap();

        assert_eq!(a.list_uploaded().await.unwrap().len(), 1);
        assert!(b.list_uploaded().await.unwrap().is_empty());
        assert!(b.search("only-in-a").unwrap().is_empty());
    }
}
