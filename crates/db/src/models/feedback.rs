//! Customer feedback models.

use serde::Serialize;
use sqlx::FromRow;
use traduko_core::types::{DbId, Timestamp};

/// A row from the `feedback` table (one per project).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub project_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

/// A project joined with its feedback, for administrator moderation views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithFeedback {
    pub id: DbId,
    pub customer_id: DbId,
    pub translator_id: Option<DbId>,
    pub language_code: String,
    pub state: String,
    pub created_at: Timestamp,
    pub feedback_text: String,
    pub feedback_created_at: Timestamp,
}
