//! Route definitions for the `/projects` resource.
//!
//! The two multipart upload routes carry a raised body limit so the 5 MB
//! file cap is enforced by the handler, not by axum's 2 MB default.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use traduko_storage::MAX_FILE_BYTES;

use crate::handlers::{projects, translator};
use crate::state::AppState;

/// Headroom for multipart framing on top of the file cap.
const UPLOAD_BODY_LIMIT: usize = MAX_FILE_BYTES + 64 * 1024;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                      -> list_mine
/// POST   /                      -> create
/// GET    /completed             -> list_completed
/// DELETE /{id}                  -> delete
/// POST   /{id}/original-file    -> upload_original (multipart)
/// POST   /{id}/translated-file  -> upload_translated (multipart)
/// POST   /{id}/approve          -> approve
/// POST   /{id}/reject           -> reject
/// PUT    /{id}/feedback         -> set_feedback
/// GET    /{id}/download         -> download (?kind=original|translated)
/// ```
pub fn router() -> Router<AppState> {
    let uploads = Router::new()
        .route("/{id}/original-file", post(projects::upload_original))
        .route("/{id}/translated-file", post(translator::upload_translated))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/", get(projects::list_mine).post(projects::create))
        .route("/completed", get(projects::list_completed))
        .route("/{id}", delete(projects::delete))
        .route("/{id}/approve", post(projects::approve))
        .route("/{id}/reject", post(projects::reject))
        .route("/{id}/feedback", put(projects::set_feedback))
        .route("/{id}/download", get(projects::download))
        .merge(uploads)
}
