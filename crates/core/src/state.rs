//! Project lifecycle states and transition guards.
//!
//! The lifecycle is linear with a single reject loop:
//!
//! ```text
//! CREATED -> ASSIGNED -> COMPLETED -> APPROVED -> CLOSED
//!                ^            |
//!                +-- reject --+
//! ```
//!
//! CREATED also moves straight to CLOSED when allocation finds no qualified
//! translator. CLOSED is terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// The five lifecycle states, stored as their upper-case names in the
/// `projects.state` text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    Created,
    Assigned,
    Completed,
    Approved,
    Closed,
}

impl ProjectState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectState::Created => "CREATED",
            ProjectState::Assigned => "ASSIGNED",
            ProjectState::Completed => "COMPLETED",
            ProjectState::Approved => "APPROVED",
            ProjectState::Closed => "CLOSED",
        }
    }

    pub fn parse(name: &str) -> Option<ProjectState> {
        match name {
            "CREATED" => Some(ProjectState::Created),
            "ASSIGNED" => Some(ProjectState::Assigned),
            "COMPLETED" => Some(ProjectState::Completed),
            "APPROVED" => Some(ProjectState::Approved),
            "CLOSED" => Some(ProjectState::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle events that drive state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Allocator found a qualified translator.
    Assign,
    /// Allocator found nobody for the language; the project is failed closed.
    FailAllocation,
    /// Translator uploaded the translated file.
    CompleteTranslation,
    /// Customer accepted the translation.
    Approve,
    /// Customer sent the translation back; the translator keeps the assignment.
    Reject,
    /// Administrator archived an approved project.
    Close,
}

/// The state an event moves a project into, or `InvalidState` if the event
/// is not legal from `from`.
pub fn next_state(from: ProjectState, event: TransitionEvent) -> Result<ProjectState, CoreError> {
    use ProjectState::*;
    use TransitionEvent::*;

    let to = match (from, event) {
        (Created, Assign) => Assigned,
        (Created, FailAllocation) => Closed,
        (Assigned, CompleteTranslation) => Completed,
        (Completed, Approve) => Approved,
        (Completed, Reject) => Assigned,
        (Approved, Close) => Closed,
        _ => {
            return Err(CoreError::InvalidState(format!(
                "{event:?} is not allowed while the project is {from}"
            )))
        }
    };
    Ok(to)
}

/// Guard helper: error unless the project is exactly in `expected`.
pub fn require_state(actual: ProjectState, expected: ProjectState) -> Result<(), CoreError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "expected project in {expected} state, found {actual}"
        )))
    }
}

/// Tagged view of the (state, translator) pair.
///
/// A translator reference is meaningful only once the project left CREATED,
/// so the variant carries it where the invariant demands it instead of the
/// row's nullable column. CLOSED keeps the reference optional: projects
/// failed at allocation close without ever being assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Assigned { translator: DbId },
    Completed { translator: DbId },
    Approved { translator: DbId },
    Closed { translator: Option<DbId> },
}

impl Lifecycle {
    /// Classify a stored (state, translator_id) pair, rejecting rows that
    /// violate the translator⇔state invariant.
    pub fn from_row(state: ProjectState, translator: Option<DbId>) -> Result<Lifecycle, CoreError> {
        let lifecycle = match (state, translator) {
            (ProjectState::Created, None) => Lifecycle::Created,
            (ProjectState::Assigned, Some(t)) => Lifecycle::Assigned { translator: t },
            (ProjectState::Completed, Some(t)) => Lifecycle::Completed { translator: t },
            (ProjectState::Approved, Some(t)) => Lifecycle::Approved { translator: t },
            (ProjectState::Closed, t) => Lifecycle::Closed { translator: t },
            (state, translator) => {
                return Err(CoreError::Internal(format!(
                    "inconsistent project row: state {state} with translator {translator:?}"
                )))
            }
        };
        Ok(lifecycle)
    }

    pub fn state(&self) -> ProjectState {
        match self {
            Lifecycle::Created => ProjectState::Created,
            Lifecycle::Assigned { .. } => ProjectState::Assigned,
            Lifecycle::Completed { .. } => ProjectState::Completed,
            Lifecycle::Approved { .. } => ProjectState::Approved,
            Lifecycle::Closed { .. } => ProjectState::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_state_names_round_trip() {
        for state in [
            ProjectState::Created,
            ProjectState::Assigned,
            ProjectState::Completed,
            ProjectState::Approved,
            ProjectState::Closed,
        ] {
            assert_eq!(ProjectState::parse(state.as_str()), Some(state));
        }
        assert_eq!(ProjectState::parse("DRAFT"), None);
    }

    #[test]
    fn test_happy_path() {
        let mut state = ProjectState::Created;
        for event in [
            TransitionEvent::Assign,
            TransitionEvent::CompleteTranslation,
            TransitionEvent::Approve,
            TransitionEvent::Close,
        ] {
            state = next_state(state, event).unwrap();
        }
        assert_eq!(state, ProjectState::Closed);
    }

    #[test]
    fn test_reject_returns_to_assigned() {
        let state = next_state(ProjectState::Completed, TransitionEvent::Reject).unwrap();
        assert_eq!(state, ProjectState::Assigned);
        // And the translator can re-upload, returning to COMPLETED.
        let state = next_state(state, TransitionEvent::CompleteTranslation).unwrap();
        assert_eq!(state, ProjectState::Completed);
    }

    #[test]
    fn test_failed_allocation_closes_created_project() {
        assert_eq!(
            next_state(ProjectState::Created, TransitionEvent::FailAllocation).unwrap(),
            ProjectState::Closed
        );
    }

    #[test]
    fn test_close_requires_approved() {
        for from in [
            ProjectState::Created,
            ProjectState::Assigned,
            ProjectState::Completed,
            ProjectState::Closed,
        ] {
            assert_matches!(
                next_state(from, TransitionEvent::Close),
                Err(CoreError::InvalidState(_))
            );
        }
    }

    #[test]
    fn test_closed_is_terminal() {
        for event in [
            TransitionEvent::Assign,
            TransitionEvent::FailAllocation,
            TransitionEvent::CompleteTranslation,
            TransitionEvent::Approve,
            TransitionEvent::Reject,
            TransitionEvent::Close,
        ] {
            assert!(next_state(ProjectState::Closed, event).is_err());
        }
    }

    #[test]
    fn test_require_state_mismatch() {
        assert_matches!(
            require_state(ProjectState::Created, ProjectState::Completed),
            Err(CoreError::InvalidState(_))
        );
        assert!(require_state(ProjectState::Approved, ProjectState::Approved).is_ok());
    }

    #[test]
    fn test_lifecycle_enforces_translator_invariant() {
        let t = uuid::Uuid::new_v4();

        assert_matches!(
            Lifecycle::from_row(ProjectState::Created, None),
            Ok(Lifecycle::Created)
        );
        assert_matches!(
            Lifecycle::from_row(ProjectState::Assigned, Some(t)),
            Ok(Lifecycle::Assigned { translator }) if translator == t
        );
        // Assigned without a translator is corrupt.
        assert_matches!(
            Lifecycle::from_row(ProjectState::Assigned, None),
            Err(CoreError::Internal(_))
        );
        // Created with a translator is corrupt.
        assert_matches!(
            Lifecycle::from_row(ProjectState::Created, Some(t)),
            Err(CoreError::Internal(_))
        );
        // Closed is legal both with and without a translator.
        assert_matches!(
            Lifecycle::from_row(ProjectState::Closed, None),
            Ok(Lifecycle::Closed { translator: None })
        );
        assert_matches!(
            Lifecycle::from_row(ProjectState::Closed, Some(t)),
            Ok(Lifecycle::Closed { translator: Some(_) })
        );
    }
}
