//! Handlers for the `/admin` resource: moderation listings, project closing,
//! and feedback responses.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use traduko_core::capability::Capability;
use traduko_core::error::CoreError;
use traduko_core::state::{next_state, ProjectState, TransitionEvent};
use traduko_core::types::DbId;
use traduko_db::models::feedback::ProjectWithFeedback;
use traduko_db::models::project::Project;
use traduko_db::repositories::{FeedbackRepo, ProjectRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::load_project;
use crate::middleware::rbac::{require_capability, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Optional state filter for the admin listings (`?state=APPROVED`).
#[derive(Debug, Deserialize)]
pub struct StateFilter {
    pub state: Option<String>,
}

impl StateFilter {
    /// Parse the filter, rejecting unknown state names.
    fn parse(&self) -> AppResult<Option<ProjectState>> {
        match &self.state {
            None => Ok(None),
            Some(name) => ProjectState::parse(name).map(Some).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown project state '{name}'"))
            }),
        }
    }
}

/// Request body for `POST /admin/feedback/respond`.
#[derive(Debug, Deserialize)]
pub struct FeedbackResponseRequest {
    pub project_id: DbId,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects?state=
///
/// All projects, optionally filtered by state.
pub async fn list_projects(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(filter): Query<StateFilter>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_capability(&user, &state.policy, Capability::ViewAllProjects)?;

    let projects = match filter.parse()? {
        Some(project_state) => ProjectRepo::list_by_state(&state.pool, project_state).await?,
        None => ProjectRepo::list_all(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/admin/projects/feedback?state=
///
/// Projects that have customer feedback, joined with the feedback text,
/// optionally filtered by state.
pub async fn list_feedback(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(filter): Query<StateFilter>,
) -> AppResult<Json<DataResponse<Vec<ProjectWithFeedback>>>> {
    require_capability(&user, &state.policy, Capability::ViewAllProjects)?;

    let rows = match filter.parse()? {
        Some(project_state) => {
            FeedbackRepo::list_projects_with_feedback_by_state(&state.pool, project_state).await?
        }
        None => FeedbackRepo::list_projects_with_feedback(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/admin/projects/{id}/close
///
/// Final moderation step: APPROVED -> CLOSED.
pub async fn close_project(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    require_capability(&user, &state.policy, Capability::CloseProject)?;

    let project = load_project(&state.pool, id).await?;
    let from = project.lifecycle()?.state();
    let to = next_state(from, TransitionEvent::Close)?;

    let moved = ProjectRepo::transition(&state.pool, id, from, to).await?;
    if !moved {
        return Err(AppError::Core(CoreError::InvalidState(
            "Project is no longer APPROVED".into(),
        )));
    }

    tracing::info!(project_id = %id, "Project closed");

    let project = load_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/admin/feedback/respond
///
/// Email the project's customer a response to their feedback. The responding
/// administrator's address goes in Reply-To so the conversation can continue
/// off-platform.
pub async fn respond_feedback(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<FeedbackResponseRequest>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    require_capability(&admin, &state.policy, Capability::RespondToFeedback)?;

    if input.message.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Response message must not be empty".into(),
        )));
    }

    let project = load_project(&state.pool, input.project_id).await?;
    FeedbackRepo::find_by_project(&state.pool, project.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id: project.id,
        }))?;

    let customer = UserRepo::find_by_id(&state.pool, project.customer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: project.customer_id,
        }))?;
    let responder = UserRepo::find_by_id(&state.pool, admin.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: admin.user_id,
        }))?;

    state
        .mailer
        .send_feedback_response(&responder.email, &customer.email, project.id, input.message.trim())
        .await
        .map_err(|e| AppError::InternalError(format!("Feedback response failed: {e}")))?;

    tracing::info!(project_id = %project.id, "Feedback response sent");

    Ok(Json(DataResponse {
        data: serde_json::json!({ "sent": true }),
    }))
}
