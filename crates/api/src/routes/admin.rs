//! Route definitions for the `/admin` resource (administrator only).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /projects             -> list_projects (?state= filter)
/// GET  /projects/feedback    -> list_feedback (?state= filter)
/// POST /projects/{id}/close  -> close_project
/// POST /feedback/respond     -> respond_feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(admin::list_projects))
        .route("/projects/feedback", get(admin::list_feedback))
        .route("/projects/{id}/close", post(admin::close_project))
        .route("/feedback/respond", post(admin::respond_feedback))
}
