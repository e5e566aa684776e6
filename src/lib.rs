//! Depot - self-hosted file repository.
//!
//! Accepts uploaded files, stores them under generated names, records
//! origin metadata in a durable index, and exposes operations to
//! browse, search, rename, move and delete stored items.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod repo;
pub mod web;

pub use config::Config;
pub use db::{Database, NewUpload, SharedDatabase, UploadRecord, UploadRepository};
pub use error::{DepotError, Result};
pub use repo::{
    PathResolver, RepositoryService, RepositoryStats, StorageBackend, TreeNode, UploadReceipt,
};
