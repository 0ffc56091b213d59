//! HTTP request handlers, grouped by resource.

pub mod admin;
pub mod auth;
pub mod projects;
pub mod translator;
pub mod user;

use axum::extract::Multipart;
use traduko_core::error::CoreError;
use traduko_core::types::DbId;
use traduko_db::models::project::Project;
use traduko_db::repositories::ProjectRepo;
use traduko_db::DbPool;
use traduko_storage::MAX_FILE_BYTES;

use crate::error::{AppError, AppResult};

/// A file received through a multipart upload.
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Read the `file` field out of a multipart request.
///
/// Enforces the 5 MB cap and rejects file names that would escape the
/// project's key prefix. Any other field is ignored.
pub(crate) async fn read_upload(multipart: &mut Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::BadRequest("The 'file' field must have a filename".into()))?;

        if file_name.contains('/') || file_name.contains('\\') {
            return Err(AppError::Core(CoreError::Validation(
                "File name must not contain path separators".into(),
            )));
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        if bytes.len() > MAX_FILE_BYTES {
            return Err(AppError::Core(CoreError::Validation(format!(
                "File exceeds the maximum size of {} bytes",
                MAX_FILE_BYTES
            ))));
        }

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::BadRequest(
        "Multipart body must contain a 'file' field".into(),
    ))
}

/// Fetch a project or reject with 404.
pub(crate) async fn load_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Project", id }))
}
