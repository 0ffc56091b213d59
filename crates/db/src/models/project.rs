//! Project entity model.

use serde::Serialize;
use sqlx::FromRow;
use traduko_core::error::CoreError;
use traduko_core::state::{Lifecycle, ProjectState};
use traduko_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
///
/// `state` is stored as its canonical upper-case name; use
/// [`Project::state`] to get the typed value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub customer_id: DbId,
    pub translator_id: Option<DbId>,
    pub language_code: String,
    pub original_file_key: Option<String>,
    pub translated_file_key: Option<String>,
    pub state: String,
    pub created_at: Timestamp,
}

impl Project {
    /// The typed lifecycle state; an unknown name means a corrupt row.
    pub fn state(&self) -> Result<ProjectState, CoreError> {
        ProjectState::parse(&self.state).ok_or_else(|| {
            CoreError::Internal(format!(
                "project {} has unknown state '{}'",
                self.id, self.state
            ))
        })
    }

    /// The tagged lifecycle view, rejecting rows where the translator
    /// reference contradicts the state.
    pub fn lifecycle(&self) -> Result<Lifecycle, CoreError> {
        Lifecycle::from_row(self.state()?, self.translator_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn row(state: &str, translator_id: Option<DbId>) -> Project {
        Project {
            id: Uuid::now_v7(),
            customer_id: Uuid::new_v4(),
            translator_id,
            language_code: "de".to_string(),
            original_file_key: None,
            translated_file_key: None,
            state: state.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn lifecycle_classifies_consistent_rows() {
        let translator = Uuid::new_v4();

        assert_matches!(row("CREATED", None).lifecycle(), Ok(Lifecycle::Created));
        assert_matches!(
            row("ASSIGNED", Some(translator)).lifecycle(),
            Ok(Lifecycle::Assigned { translator: t }) if t == translator
        );
        // Projects failed at allocation close without a translator.
        assert_matches!(
            row("CLOSED", None).lifecycle(),
            Ok(Lifecycle::Closed { translator: None })
        );
    }

    #[test]
    fn lifecycle_rejects_assigned_row_without_translator() {
        // A row claiming ASSIGNED with no translator reference is corrupt
        // and must be an internal error, not a guard rejection.
        assert_matches!(
            row("ASSIGNED", None).lifecycle(),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn lifecycle_rejects_unknown_state_name() {
        assert_matches!(row("DRAFT", None).lifecycle(), Err(CoreError::Internal(_)));
    }
}
