//! API handlers for the Depot web surface.

pub mod repository;

pub use repository::*;

use crate::repo::RepositoryService;

/// Shared application state for request handlers.
pub struct AppState {
    /// The repository service behind every operation.
    pub repository: RepositoryService,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(repository: RepositoryService, max_upload_size: u64) -> Self {
        Self {
            repository,
            max_upload_size,
        }
    }
}
