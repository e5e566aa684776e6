//! Request DTOs for the Depot web API.

use serde::Deserialize;

/// Parameters for POST /createdir/.
#[derive(Debug, Deserialize)]
pub struct CreateDirParams {
    /// Relative path of the directory to create.
    pub directory_name: String,
}

/// Parameters for GET /search/.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Literal substring to match against entry names.
    pub search_term: String,
}

/// Parameters for PUT /rename/.
#[derive(Debug, Deserialize)]
pub struct RenameParams {
    /// Current relative path.
    pub old_name: String,
    /// New relative path.
    pub new_name: String,
}

/// Parameters for DELETE /delete/.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    /// Relative path of the item to delete.
    pub item_name: String,
}

/// Parameters for POST /move/.
#[derive(Debug, Deserialize)]
pub struct MoveParams {
    /// Relative path of the item to move.
    pub item_name: String,
    /// Relative path of the target directory.
    pub target_directory: String,
}
