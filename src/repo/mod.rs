//! Repository core for Depot.
//!
//! This module implements the file repository proper:
//! - Path resolution bounded by the repository root
//! - Physical storage operations and tree walks
//! - Aggregate statistics with content classification
//! - The repository service tying storage and metadata together

mod path;
mod service;
mod stats;
mod storage;

pub use path::PathResolver;
pub use service::{RepositoryService, UploadReceipt};
pub use stats::{ContentCategory, RepositoryStats};
pub use storage::{StorageBackend, TreeNode, MAX_WALK_DEPTH};
