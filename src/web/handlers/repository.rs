//! Repository handlers for the Depot web API.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use std::sync::Arc;

use crate::web::dto::{
    CreateDirParams, DeleteParams, DeleteResponse, DirectoryResponse, MoveParams, MoveResponse,
    RenameParams, RenameResponse, SearchParams, SearchResponse, UploadResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /uploadfile/ - Upload a file.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut filename: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            content = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to read file content: {}", e);
                        ApiError::bad_request("Failed to read file")
                    })?
                    .to_vec(),
            );
        }
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("No file content"))?;

    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {max_mb}MB)"
        )));
    }

    let receipt = state.repository.upload(&filename, &content).await?;

    Ok(Json(UploadResponse {
        filename: receipt.stored_name,
        status: "uploaded successfully".to_string(),
    }))
}

/// GET /uploaded-list/ - List uploads as storedName -> originalName.
pub async fn uploaded_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let records = state.repository.list_uploaded().await?;

    let mut listing = serde_json::Map::new();
    for record in records {
        listing.insert(
            record.stored_name,
            serde_json::Value::String(record.original_name),
        );
    }

    Ok(Json(serde_json::Value::Object(listing)))
}

/// POST /createdir/ - Create a directory.
pub async fn create_directory(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreateDirParams>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    state.repository.create_directory(&params.directory_name)?;

    Ok(Json(DirectoryResponse {
        directory: params.directory_name,
        status: "directory created".to_string(),
    }))
}

/// GET /search/ - Search entries by name substring.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let matches = state.repository.search(&params.search_term)?;

    Ok(Json(SearchResponse { matches }))
}

/// PUT /rename/ - Rename an item.
pub async fn rename(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RenameParams>,
) -> Result<Json<RenameResponse>, ApiError> {
    state.repository.rename(&params.old_name, &params.new_name)?;

    Ok(Json(RenameResponse {
        old_name: params.old_name,
        new_name: params.new_name,
        status: "renamed successfully".to_string(),
    }))
}

/// DELETE /delete/ - Delete a file or directory.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.repository.delete(&params.item_name)?;

    Ok(Json(DeleteResponse {
        item_name: params.item_name,
        status: "deleted successfully".to_string(),
    }))
}

/// POST /move/ - Move an item into a target directory.
pub async fn move_item(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoveParams>,
) -> Result<Json<MoveResponse>, ApiError> {
    state
        .repository
        .move_item(&params.item_name, &params.target_directory)?;

    Ok(Json(MoveResponse {
        item_name: params.item_name,
        target_directory: params.target_directory,
        status: "moved successfully".to_string(),
    }))
}

/// GET /filetree/ - Nested listing of the repository.
pub async fn file_tree(
    State(state): State<Arc<AppState>>,
) -> Result<Json<crate::repo::TreeNode>, ApiError> {
    let tree = state.repository.tree()?;

    Ok(Json(tree))
}

/// GET /monitor/ - Aggregate statistics over the repository.
pub async fn monitor(
    State(state): State<Arc<AppState>>,
) -> Result<Json<crate::repo::RepositoryStats>, ApiError> {
    let stats = state.repository.stats()?;

    Ok(Json(stats))
}
