//! Repository for the `feedback` table.

use sqlx::PgPool;
use traduko_core::state::ProjectState;
use traduko_core::types::DbId;

use crate::models::feedback::{Feedback, ProjectWithFeedback};

/// Column list for `feedback` queries.
const COLUMNS: &str = "project_id, text, created_at";

/// Column list for the project/feedback moderation join.
const JOINED_COLUMNS: &str = "p.id, p.customer_id, p.translator_id, p.language_code, \
                              p.state, p.created_at, \
                              f.text AS feedback_text, f.created_at AS feedback_created_at";

/// Provides upsert and moderation queries for project feedback.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert or replace the feedback for a project (one record per project).
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        text: &str,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback (project_id, text)
             VALUES ($1, $2)
             ON CONFLICT (project_id) DO UPDATE SET text = EXCLUDED.text
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(project_id)
            .bind(text)
            .fetch_one(pool)
            .await
    }

    /// The feedback for a project, if any.
    pub async fn find_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback WHERE project_id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// All projects that have feedback, newest feedback first.
    pub async fn list_projects_with_feedback(
        pool: &PgPool,
    ) -> Result<Vec<ProjectWithFeedback>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM projects p
             JOIN feedback f ON f.project_id = p.id
             ORDER BY f.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithFeedback>(&query)
            .fetch_all(pool)
            .await
    }

    /// Projects in `state` that have feedback, newest feedback first.
    pub async fn list_projects_with_feedback_by_state(
        pool: &PgPool,
        state: ProjectState,
    ) -> Result<Vec<ProjectWithFeedback>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM projects p
             JOIN feedback f ON f.project_id = p.id
             WHERE p.state = $1
             ORDER BY f.created_at DESC"
        );
        sqlx::query_as::<_, ProjectWithFeedback>(&query)
            .bind(state.as_str())
            .fetch_all(pool)
            .await
    }
}
