//! Route definitions for the `/user` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// PUT /role -> switch_role (customer <-> translator)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/role", put(user::switch_role))
}
