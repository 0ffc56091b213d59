//! Handlers for the `/translator` resource: language registration and the
//! translator's side of the project lifecycle.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use traduko_core::capability::Capability;
use traduko_core::error::CoreError;
use traduko_core::language::validate_language_code;
use traduko_core::state::{next_state, ProjectState, TransitionEvent};
use traduko_core::types::DbId;
use traduko_db::models::project::Project;
use traduko_db::repositories::{ProjectRepo, TranslatorLanguageRepo, UserRepo};
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

/// Request body for adding or removing registered languages.
#[derive(Debug, Deserialize)]
pub struct LanguageCodesRequest {
    pub codes: Vec<String>,
}

/// Response for `POST /projects/{id}/translated-file`.
#[derive(Debug, Serialize)]
pub struct TranslatedUploadOutcome {
    pub file_key: String,
    pub state: &'static str,
}

// ---------------------------------------------------------------------------
// Language registration
// ---------------------------------------------------------------------------

/// GET /api/v1/translator/languages -- the caller's registered languages.
pub async fn list_languages(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    require_capability(&user, &state.policy, Capability::ViewOwnLanguages)?;

    let codes = TranslatorLanguageRepo::languages_of(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// POST /api/v1/translator/languages
///
/// Register languages for the caller. Idempotent: codes already registered
/// are no-ops. Every code must be valid ISO 639-1 or the whole request is
/// rejected.
pub async fn add_languages(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<LanguageCodesRequest>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    require_capability(&user, &state.policy, Capability::UpdateOwnLanguages)?;
    let codes = validated_codes(&input)?;

    TranslatorLanguageRepo::add_languages(&state.pool, user.user_id, &codes).await?;
    tracing::info!(translator_id = %user.user_id, count = codes.len(), "Languages registered");

    let codes = TranslatorLanguageRepo::languages_of(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// DELETE /api/v1/translator/languages
///
/// Deregister languages for the caller. Idempotent on absent codes.
pub async fn remove_languages(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<LanguageCodesRequest>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    require_capability(&user, &state.policy, Capability::UpdateOwnLanguages)?;
    let codes = validated_codes(&input)?;

    TranslatorLanguageRepo::remove_languages(&state.pool, user.user_id, &codes).await?;
    tracing::info!(translator_id = %user.user_id, count = codes.len(), "Languages deregistered");

    let codes = TranslatorLanguageRepo::languages_of(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// Validate every code in the request, rejecting the whole batch on the
/// first invalid one.
fn validated_codes(input: &LanguageCodesRequest) -> AppResult<Vec<String>> {
    if input.codes.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one language code is required".into(),
        )));
    }
    input
        .codes
        .iter()
        .map(|code| {
            validate_language_code(code)
                .map(str::to_string)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Project views
// ---------------------------------------------------------------------------

/// GET /api/v1/translator/projects -- everything ever assigned to the caller.
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_capability(&user, &state.policy, Capability::ViewAssignedProjects)?;

    let projects = ProjectRepo::list_by_translator(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/translator/projects/assigned -- current workload only.
pub async fn list_assigned(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_capability(&user, &state.policy, Capability::ViewAssignedProjects)?;

    let projects =
        ProjectRepo::list_by_translator_and_state(&state.pool, user.user_id, ProjectState::Assigned)
            .await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/translator/projects/history -- past work (anything no longer
/// ASSIGNED to the caller).
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_capability(&user, &state.policy, Capability::ViewAssignedProjects)?;

    let projects = ProjectRepo::list_by_translator_excluding_state(
        &state.pool,
        user.user_id,
        ProjectState::Assigned,
    )
    .await?;
    Ok(Json(DataResponse { data: projects }))
}

// ---------------------------------------------------------------------------
// Translated-file upload
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/translated-file
///
/// Multipart upload of the finished translation (assignee, ASSIGNED only,
/// <= 5 MB). Moves the project to COMPLETED and notifies the customer that
/// the translation is ready for review.
pub async fn upload_translated(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<TranslatedUploadOutcome>>> {
    require_capability(&user, &state.policy, Capability::UploadTranslatedFile)?;

    let project = load_project(&state.pool, id).await?;
    // Classify the row first: a state/translator mismatch is corruption and
    // must surface as 500, not as a guard rejection.
    let lifecycle = project.lifecycle()?;
    if project.translator_id != Some(user.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assigned translator may upload the translation".into(),
        )));
    }
    let completed = next_state(lifecycle.state(), TransitionEvent::CompleteTranslation)?;

    let upload = read_upload(&mut multipart).await?;
    let key = ObjectStorage::file_key(&id, &upload.file_name);

    // Replacement is delete-then-upload, not atomic.
    if let Some(old_key) = &project.translated_file_key {
        state.storage.delete_prefix(old_key).await?;
    }
    state
        .storage
        .upload(&key, upload.bytes, &upload.content_type)
        .await?;

    let updated = ProjectRepo::set_translated_file_key(&state.pool, id, &key).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    let moved = ProjectRepo::transition(&state.pool, id, lifecycle.state(), completed).await?;
    if !moved {
        return Err(AppError::Core(CoreError::InvalidState(
            "Project left ASSIGNED before the upload finished".into(),
        )));
    }

    tracing::info!(project_id = %id, "Translation uploaded; project completed");

    let customer = UserRepo::find_by_id(&state.pool, project.customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: project.customer_id,
        }))?;
    state
        .mailer
        .send_project_completed(&customer.email, id)
        .await
        .map_err(|e| AppError::InternalError(format!("Completed notification failed: {e}")))?;

    Ok(Json(DataResponse {
        data: TranslatedUploadOutcome {
            file_key: key,
            state: completed.as_str(),
        },
    }))
}
