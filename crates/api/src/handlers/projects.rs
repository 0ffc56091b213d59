//! Handlers for the customer-facing `/projects` resource.
//!
//! Every mutating handler runs the same guard sequence: capability, then
//! ownership, then the state precondition. State changes go through
//! compare-and-swap updates so concurrent requests lose cleanly with 409
//! instead of silently double-applying.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use traduko_core::allocator::{AllocationOutcome, Allocator, PendingProject};
use traduko_core::capability::Capability;
use traduko_core::error::CoreError;
use traduko_core::language::validate_language_code;
use traduko_core::state::{next_state, require_state, ProjectState, TransitionEvent};
use traduko_core::types::DbId;
use traduko_db::adapters::{PgProjectStore, PgTranslatorDirectory, PgUserLookup};
use traduko_db::models::project::Project;
use traduko_db::repositories::{FeedbackRepo, ProjectRepo};
use traduko_events::MailNotifier;
use traduko_storage::ObjectStorage;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_project, read_upload};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::require_capability;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// ISO 639-1 code of the language the document should be translated into.
    pub language_code: String,
}

/// Request body for `PUT /projects/{id}/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub text: String,
}

/// Query parameters for `GET /projects/{id}/download`.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// `original` or `translated`.
    pub kind: String,
}

/// Result of an original-file upload: the stored key plus where the
/// allocation pass left the project.
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub file_key: String,
    pub state: &'static str,
    pub translator_id: Option<DbId>,
}

/// Response for `GET /projects/{id}/download`: a time-limited URL.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// Create a project in CREATED state. The language code is validated against
/// the ISO 639-1 table before anything is written.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    require_capability(&user, &state.policy, Capability::CreateProject)?;

    let code = validate_language_code(&input.language_code)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let project = ProjectRepo::create(&state.pool, user.user_id, code).await?;
    tracing::info!(project_id = %project.id, language = code, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects -- the caller's own projects, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_capability(&user, &state.policy, Capability::ViewOwnProjects)?;

    let projects = ProjectRepo::list_by_customer(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/completed -- the caller's projects awaiting review.
pub async fn list_completed(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_capability(&user, &state.policy, Capability::ViewOwnProjects)?;

    let projects =
        ProjectRepo::list_by_customer_and_state(&state.pool, user.user_id, ProjectState::Completed)
            .await?;
    Ok(Json(DataResponse { data: projects }))
}

/// DELETE /api/v1/projects/{id}
///
/// Owner-gated. Stored files are removed first; if storage fails the row
/// survives and the request errors.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_capability(&user, &state.policy, Capability::DeleteOwnProject)?;

    let project = load_project(&state.pool, id).await?;
    require_owner(&project, &user)?;

    state.storage.delete_prefix(&format!("{id}/")).await?;

    let deleted = ProjectRepo::delete_owned(&state.pool, id, user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    tracing::info!(project_id = %id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/original-file
///
/// Multipart upload of the document to translate (owner, CREATED only,
/// <= 5 MB). Re-uploading replaces the previous file. A successful store
/// triggers the allocation pass, which either assigns a translator or fails
/// the project closed.
pub async fn upload_original(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadOutcome>>> {
    require_capability(&user, &state.policy, Capability::UploadOriginalFile)?;

    let project = load_project(&state.pool, id).await?;
    require_owner(&project, &user)?;
    require_state(project.lifecycle()?.state(), ProjectState::Created)?;

    let upload = read_upload(&mut multipart).await?;
    let key = ObjectStorage::file_key(&id, &upload.file_name);

    // Replacement is delete-then-upload, not atomic.
    if let Some(old_key) = &project.original_file_key {
        state.storage.delete_prefix(old_key).await?;
    }
    state
        .storage
        .upload(&key, upload.bytes, &upload.content_type)
        .await?;

    let updated = ProjectRepo::set_original_file_key(&state.pool, id, &key).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    let allocator = Allocator::new(
        PgProjectStore::new(state.pool.clone()),
        PgTranslatorDirectory::new(state.pool.clone()),
        PgUserLookup::new(state.pool.clone()),
        MailNotifier::new(state.mailer.clone()),
    );
    let pending = PendingProject {
        id,
        customer_id: project.customer_id,
        language_code: project.language_code.clone(),
    };

    let outcome = allocator.allocate(&pending).await?;
    let (new_state, translator_id) = match outcome {
        AllocationOutcome::Assigned { translator } => {
            tracing::info!(project_id = %id, translator_id = %translator, "Project assigned");
            (ProjectState::Assigned.as_str(), Some(translator))
        }
        AllocationOutcome::Closed => {
            tracing::info!(project_id = %id, "No qualified translator; project closed");
            (ProjectState::Closed.as_str(), None)
        }
    };

    Ok(Json(DataResponse {
        data: UploadOutcome {
            file_key: key,
            state: new_state,
            translator_id,
        },
    }))
}

/// POST /api/v1/projects/{id}/approve
///
/// Owner accepts the translation: COMPLETED -> APPROVED.
pub async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    review(state, user, id, TransitionEvent::Approve).await
}

/// POST /api/v1/projects/{id}/reject
///
/// Owner sends the translation back: COMPLETED -> ASSIGNED. The same
/// translator stays on the project for the rework.
pub async fn reject(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    review(state, user, id, TransitionEvent::Reject).await
}

/// Shared approve/reject flow, owner-only. The target state comes out of
/// the transition table, which also rejects reviews outside COMPLETED.
async fn review(
    state: AppState,
    user: AuthUser,
    id: DbId,
    event: TransitionEvent,
) -> AppResult<Json<DataResponse<Project>>> {
    require_capability(&user, &state.policy, Capability::ViewOwnProjects)?;

    let project = load_project(&state.pool, id).await?;
    require_owner(&project, &user)?;

    let from = project.lifecycle()?.state();
    let to = next_state(from, event)?;

    let moved = ProjectRepo::transition(&state.pool, id, from, to).await?;
    if !moved {
        return Err(AppError::Core(CoreError::InvalidState(
            "Project is no longer awaiting review".into(),
        )));
    }

    tracing::info!(project_id = %id, to = to.as_str(), "Project reviewed");

    let project = load_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}/feedback
///
/// Upsert the customer's feedback while the project is COMPLETED. One
/// feedback record per project; re-submitting replaces the text.
pub async fn set_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<DataResponse<traduko_db::models::feedback::Feedback>>> {
    require_capability(&user, &state.policy, Capability::AddProjectFeedback)?;

    let project = load_project(&state.pool, id).await?;
    require_owner(&project, &user)?;
    require_state(project.lifecycle()?.state(), ProjectState::Completed)?;

    if input.text.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Feedback text must not be empty".into(),
        )));
    }

    let feedback = FeedbackRepo::upsert(&state.pool, id, input.text.trim()).await?;
    Ok(Json(DataResponse { data: feedback }))
}

/// GET /api/v1/projects/{id}/download?kind=original|translated
///
/// Presigned, time-limited download URL. Participant-gated: the owning
/// customer and the assigned translator may download either file.
pub async fn download(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<DownloadQuery>,
) -> AppResult<Json<DataResponse<DownloadResponse>>> {
    let (capability, entity) = match query.kind.as_str() {
        "original" => (Capability::DownloadOriginalFile, "Original file"),
        "translated" => (Capability::DownloadTranslatedFile, "Translated file"),
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown download kind '{other}'; expected 'original' or 'translated'"
            )))
        }
    };
    require_capability(&user, &state.policy, capability)?;

    let project = load_project(&state.pool, id).await?;
    let is_participant =
        project.customer_id == user.user_id || project.translator_id == Some(user.user_id);
    if !is_participant {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only project participants may download its files".into(),
        )));
    }

    let key = match query.kind.as_str() {
        "original" => project.original_file_key.as_deref(),
        _ => project.translated_file_key.as_deref(),
    };
    let key = key.ok_or(AppError::Core(CoreError::NotFound { entity, id }))?;

    let url = state.storage.presigned_download_url(key).await?;
    Ok(Json(DataResponse {
        data: DownloadResponse { url },
    }))
}

/// Ownership guard shared by the customer-facing handlers.
fn require_owner(project: &Project, user: &AuthUser) -> AppResult<()> {
    if project.customer_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project owner may perform this action".into(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn project_owned_by(customer_id: DbId) -> Project {
        Project {
            id: Uuid::now_v7(),
            customer_id,
            translator_id: Some(Uuid::new_v4()),
            language_code: "fr".to_string(),
            original_file_key: Some("key/original.pdf".to_string()),
            translated_file_key: None,
            state: ProjectState::Completed.as_str().to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn customer(user_id: DbId) -> AuthUser {
        AuthUser {
            user_id,
            role: "customer".to_string(),
        }
    }

    #[test]
    fn owner_passes_ownership_guard() {
        let owner_id = Uuid::new_v4();
        let project = project_owned_by(owner_id);

        assert!(require_owner(&project, &customer(owner_id)).is_ok());
    }

    #[test]
    fn non_owner_is_rejected_with_forbidden() {
        // A customer acting on somebody else's project must get 403, and
        // the guard fires before any state write is attempted.
        let project = project_owned_by(Uuid::new_v4());

        let result = require_owner(&project, &customer(Uuid::new_v4()));
        assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));
    }
}
