//! Response DTOs for the Depot web API.

use serde::Serialize;

/// Response for POST /uploadfile/.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Generated storage name the file was stored under.
    pub filename: String,
    /// Status message.
    pub status: String,
}

/// Response for POST /createdir/.
#[derive(Debug, Serialize)]
pub struct DirectoryResponse {
    /// Relative path of the created directory.
    pub directory: String,
    /// Status message.
    pub status: String,
}

/// Response for GET /search/.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matching root-relative paths.
    pub matches: Vec<String>,
}

/// Response for PUT /rename/.
#[derive(Debug, Serialize)]
pub struct RenameResponse {
    /// Previous relative path.
    pub old_name: String,
    /// New relative path.
    pub new_name: String,
    /// Status message.
    pub status: String,
}

/// Response for DELETE /delete/.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Relative path of the deleted item.
    pub item_name: String,
    /// Status message.
    pub status: String,
}

/// Response for POST /move/.
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    /// Relative path of the moved item.
    pub item_name: String,
    /// Relative path of the target directory.
    pub target_directory: String,
    /// Status message.
    pub status: String,
}
