pub mod admin;
pub mod auth;
pub mod health;
pub mod projects;
pub mod translator;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/me                           profile (requires auth)
///
/// /user/role                         switch role (PUT, requires auth)
///
/// /projects                          list own, create
/// /projects/completed                own COMPLETED projects
/// /projects/{id}                     delete (owner)
/// /projects/{id}/original-file       upload document (owner, CREATED)
/// /projects/{id}/translated-file     upload translation (assignee, ASSIGNED)
/// /projects/{id}/approve             approve translation (owner, COMPLETED)
/// /projects/{id}/reject              reject translation (owner, COMPLETED)
/// /projects/{id}/feedback            upsert feedback (owner, COMPLETED)
/// /projects/{id}/download            presigned URL (?kind=original|translated)
///
/// /translator/languages              list, add, remove (GET, POST, DELETE)
/// /translator/projects               everything ever assigned
/// /translator/projects/assigned      current workload
/// /translator/projects/history       past work
///
/// /admin/projects                    all projects (?state= filter)
/// /admin/projects/feedback           projects with feedback (?state= filter)
/// /admin/projects/{id}/close         close project (APPROVED only)
/// /admin/feedback/respond            email a feedback response
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/user", user::router())
        .nest("/projects", projects::router())
        .nest("/translator", translator::router())
        .nest("/admin", admin::router())
}
