//! Route definitions for the `/translator` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::translator;
use crate::state::AppState;

/// Routes mounted at `/translator`.
///
/// ```text
/// GET    /languages          -> list_languages
/// POST   /languages          -> add_languages
/// DELETE /languages          -> remove_languages
/// GET    /projects           -> list_projects
/// GET    /projects/assigned  -> list_assigned
/// GET    /projects/history   -> list_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/languages",
            get(translator::list_languages)
                .post(translator::add_languages)
                .delete(translator::remove_languages),
        )
        .route("/projects", get(translator::list_projects))
        .route("/projects/assigned", get(translator::list_assigned))
        .route("/projects/history", get(translator::list_history))
}
