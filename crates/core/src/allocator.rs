//! Translator allocation for newly uploaded projects.
//!
//! Once a customer uploads the original file, [`Allocator::allocate`] either
//! assigns a random qualified translator (project -> ASSIGNED) or fails the
//! project closed (project -> CLOSED) when nobody is registered for the
//! language. Collaborators are injected as traits so the flow is testable
//! without a database or SMTP server.
//!
//! No step is retried here. Each failure point maps to its own
//! [`AllocationError`] variant so the caller can tell a half-done assignment
//! apart from a missed notification.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::state::ProjectState;
use crate::types::DbId;

/// The slice of a project the allocator needs.
#[derive(Debug, Clone)]
pub struct PendingProject {
    pub id: DbId,
    pub customer_id: DbId,
    pub language_code: String,
}

/// A translator qualified for some language, as returned by the directory.
#[derive(Debug, Clone)]
pub struct QualifiedTranslator {
    pub id: DbId,
    pub email: String,
}

/// Persistence operations the allocator performs on projects.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Record the translator assignment on the project row.
    async fn assign_translator(&self, project: DbId, translator: DbId) -> Result<(), CoreError>;

    /// Compare-and-swap state transition; `InvalidState` if the project is
    /// no longer in `from`.
    async fn transition(
        &self,
        project: DbId,
        from: ProjectState,
        to: ProjectState,
    ) -> Result<(), CoreError>;
}

/// Lookup of qualified translators by language.
#[async_trait]
pub trait TranslatorDirectory: Send + Sync {
    /// One translator registered for `code`, chosen uniformly at random,
    /// or `None` if the qualified set is empty.
    async fn pick_for_language(&self, code: &str) -> Result<Option<QualifiedTranslator>, CoreError>;
}

/// Resolution of user contact addresses.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn email_of(&self, user: DbId) -> Result<Option<String>, CoreError>;
}

/// Outcome notifications. Fire-and-forget: failures are reported to the
/// caller but never retried or rolled back.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn project_assigned(&self, email: &str, project: DbId) -> Result<(), CoreError>;
    async fn allocation_failed(&self, email: &str, project: DbId) -> Result<(), CoreError>;
}

/// How an allocation concluded when no step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// A translator was assigned and notified; project is ASSIGNED.
    Assigned { translator: DbId },
    /// No qualified translator exists; customer notified, project CLOSED.
    Closed,
}

/// Distinguishable allocation failure points, one per side effect.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// Writing the assignment or the ASSIGNED transition failed. The project
    /// may hold a translator id while still in CREATED.
    #[error("failed to assign translator to project: {0}")]
    AssignmentFailed(#[source] CoreError),

    /// The project is ASSIGNED but the translator was not notified.
    #[error("translator assigned but notification failed: {0}")]
    NotificationFailed(#[source] CoreError),

    /// No translator exists and the customer could not be resolved or
    /// notified; project state is unchanged.
    #[error("failed to notify customer of failed allocation: {0}")]
    NotFoundNotificationFailed(#[source] CoreError),

    /// Customer was notified but the CLOSED transition failed.
    #[error("failed to close project after no translator was found: {0}")]
    CloseFailed(#[source] CoreError),
}

/// Orchestrates a single best-effort allocation pass.
pub struct Allocator<S, D, U, N> {
    store: S,
    directory: D,
    users: U,
    notifier: N,
}

impl<S, D, U, N> Allocator<S, D, U, N>
where
    S: ProjectStore,
    D: TranslatorDirectory,
    U: UserLookup,
    N: Notifier,
{
    pub fn new(store: S, directory: D, users: U, notifier: N) -> Self {
        Self {
            store,
            directory,
            users,
            notifier,
        }
    }

    /// Assign `project` to a qualified translator, or fail it closed.
    ///
    /// The assignment write happens before the state write; if either fails
    /// the whole operation aborts with [`AllocationError::AssignmentFailed`].
    /// A notification-only failure leaves the project ASSIGNED.
    pub async fn allocate(
        &self,
        project: &PendingProject,
    ) -> Result<AllocationOutcome, AllocationError> {
        let picked = self
            .directory
            .pick_for_language(&project.language_code)
            .await
            .map_err(AllocationError::AssignmentFailed)?;

        let Some(translator) = picked else {
            return self.fail_closed(project).await;
        };

        self.store
            .assign_translator(project.id, translator.id)
            .await
            .map_err(AllocationError::AssignmentFailed)?;
        self.store
            .transition(project.id, ProjectState::Created, ProjectState::Assigned)
            .await
            .map_err(AllocationError::AssignmentFailed)?;

        self.notifier
            .project_assigned(&translator.email, project.id)
            .await
            .map_err(AllocationError::NotificationFailed)?;

        Ok(AllocationOutcome::Assigned {
            translator: translator.id,
        })
    }

    /// Nobody is registered for the language: tell the customer, then close.
    async fn fail_closed(
        &self,
        project: &PendingProject,
    ) -> Result<AllocationOutcome, AllocationError> {
        let email = self
            .users
            .email_of(project.customer_id)
            .await
            .map_err(AllocationError::NotFoundNotificationFailed)?
            .ok_or_else(|| {
                AllocationError::NotFoundNotificationFailed(CoreError::NotFound {
                    entity: "User",
                    id: project.customer_id,
                })
            })?;

        self.notifier
            .allocation_failed(&email, project.id)
            .await
            .map_err(AllocationError::NotFoundNotificationFailed)?;

        self.store
            .transition(project.id, ProjectState::Created, ProjectState::Closed)
            .await
            .map_err(AllocationError::CloseFailed)?;

        Ok(AllocationOutcome::Closed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    /// In-memory project store tracking assignment and state writes.
    struct MemStore {
        translator: Mutex<Option<DbId>>,
        state: Mutex<ProjectState>,
        fail_assign: bool,
        fail_transition: bool,
    }

    impl Default for MemStore {
        fn default() -> Self {
            Self {
                translator: Mutex::new(None),
                state: Mutex::new(ProjectState::Created),
                fail_assign: false,
                fail_transition: false,
            }
        }
    }

    #[async_trait]
    impl ProjectStore for &MemStore {
        async fn assign_translator(
            &self,
            _project: DbId,
            translator: DbId,
        ) -> Result<(), CoreError> {
            if self.fail_assign {
                return Err(CoreError::Internal("assign write failed".into()));
            }
            *self.translator.lock().unwrap() = Some(translator);
            Ok(())
        }

        async fn transition(
            &self,
            _project: DbId,
            from: ProjectState,
            to: ProjectState,
        ) -> Result<(), CoreError> {
            if self.fail_transition {
                return Err(CoreError::Internal("state write failed".into()));
            }
            let mut state = self.state.lock().unwrap();
            if *state != from {
                return Err(CoreError::InvalidState(format!(
                    "expected {from}, found {state}"
                )));
            }
            *state = to;
            Ok(())
        }
    }

    /// Directory backed by a language -> translator map.
    #[derive(Default)]
    struct MemDirectory {
        by_language: HashMap<String, QualifiedTranslator>,
    }

    #[async_trait]
    impl TranslatorDirectory for &MemDirectory {
        async fn pick_for_language(
            &self,
            code: &str,
        ) -> Result<Option<QualifiedTranslator>, CoreError> {
            Ok(self.by_language.get(code).cloned())
        }
    }

    #[derive(Default)]
    struct MemUsers {
        emails: HashMap<DbId, String>,
    }

    #[async_trait]
    impl UserLookup for &MemUsers {
        async fn email_of(&self, user: DbId) -> Result<Option<String>, CoreError> {
            Ok(self.emails.get(&user).cloned())
        }
    }

    /// Notifier recording every send, optionally failing.
    #[derive(Default)]
    struct MemNotifier {
        assigned: Mutex<Vec<(String, DbId)>>,
        failed: Mutex<Vec<(String, DbId)>>,
        error_on_send: bool,
    }

    #[async_trait]
    impl Notifier for &MemNotifier {
        async fn project_assigned(&self, email: &str, project: DbId) -> Result<(), CoreError> {
            if self.error_on_send {
                return Err(CoreError::Internal("smtp down".into()));
            }
            self.assigned.lock().unwrap().push((email.into(), project));
            Ok(())
        }

        async fn allocation_failed(&self, email: &str, project: DbId) -> Result<(), CoreError> {
            if self.error_on_send {
                return Err(CoreError::Internal("smtp down".into()));
            }
            self.failed.lock().unwrap().push((email.into(), project));
            Ok(())
        }
    }

    fn pending(language: &str) -> PendingProject {
        PendingProject {
            id: Uuid::now_v7(),
            customer_id: Uuid::new_v4(),
            language_code: language.to_string(),
        }
    }

    #[tokio::test]
    async fn test_allocation_assigns_and_notifies_once() {
        let translator_id = Uuid::new_v4();
        let store = MemStore::default();
        let mut directory = MemDirectory::default();
        directory.by_language.insert(
            "cs".into(),
            QualifiedTranslator {
                id: translator_id,
                email: "t1@example.com".into(),
            },
        );
        let users = MemUsers::default();
        let notifier = MemNotifier::default();

        let allocator = Allocator::new(&store, &directory, &users, &notifier);
        let project = pending("cs");
        let outcome = allocator.allocate(&project).await.unwrap();

        assert_eq!(
            outcome,
            AllocationOutcome::Assigned {
                translator: translator_id
            }
        );
        assert_eq!(*store.translator.lock().unwrap(), Some(translator_id));
        assert_eq!(*store.state.lock().unwrap(), ProjectState::Assigned);

        let sent = notifier.assigned.lock().unwrap();
        assert_eq!(sent.len(), 1, "exactly one assigned notification");
        assert_eq!(sent[0], ("t1@example.com".to_string(), project.id));
        assert!(notifier.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_translator_closes_and_notifies_customer() {
        let store = MemStore::default();
        let directory = MemDirectory::default();
        let mut users = MemUsers::default();
        let project = pending("fr");
        users
            .emails
            .insert(project.customer_id, "cust@example.com".into());
        let notifier = MemNotifier::default();

        let allocator = Allocator::new(&store, &directory, &users, &notifier);
        let outcome = allocator.allocate(&project).await.unwrap();

        assert_eq!(outcome, AllocationOutcome::Closed);
        assert_eq!(*store.translator.lock().unwrap(), None);
        assert_eq!(*store.state.lock().unwrap(), ProjectState::Closed);

        let failed = notifier.failed.lock().unwrap();
        assert_eq!(failed.len(), 1, "exactly one allocation-failed notification");
        assert_eq!(failed[0], ("cust@example.com".to_string(), project.id));
        assert!(notifier.assigned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assignment_write_failure_aborts() {
        let store = MemStore {
            fail_assign: true,
            ..MemStore::default()
        };
        let mut directory = MemDirectory::default();
        directory.by_language.insert(
            "cs".into(),
            QualifiedTranslator {
                id: Uuid::new_v4(),
                email: "t1@example.com".into(),
            },
        );
        let users = MemUsers::default();
        let notifier = MemNotifier::default();

        let allocator = Allocator::new(&store, &directory, &users, &notifier);
        let err = allocator.allocate(&pending("cs")).await.unwrap_err();

        assert_matches!(err, AllocationError::AssignmentFailed(_));
        assert_eq!(*store.state.lock().unwrap(), ProjectState::Created);
        assert!(notifier.assigned.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_leaves_project_assigned() {
        let store = MemStore::default();
        let mut directory = MemDirectory::default();
        directory.by_language.insert(
            "cs".into(),
            QualifiedTranslator {
                id: Uuid::new_v4(),
                email: "t1@example.com".into(),
            },
        );
        let users = MemUsers::default();
        let notifier = MemNotifier {
            error_on_send: true,
            ..MemNotifier::default()
        };

        let allocator = Allocator::new(&store, &directory, &users, &notifier);
        let err = allocator.allocate(&pending("cs")).await.unwrap_err();

        assert_matches!(err, AllocationError::NotificationFailed(_));
        // Notification failure is not rolled back.
        assert_eq!(*store.state.lock().unwrap(), ProjectState::Assigned);
    }

    #[tokio::test]
    async fn test_unknown_customer_leaves_state_unchanged() {
        let store = MemStore::default();
        let directory = MemDirectory::default();
        let users = MemUsers::default(); // customer email unresolvable
        let notifier = MemNotifier::default();

        let allocator = Allocator::new(&store, &directory, &users, &notifier);
        let err = allocator.allocate(&pending("fr")).await.unwrap_err();

        assert_matches!(err, AllocationError::NotFoundNotificationFailed(_));
        assert_eq!(*store.state.lock().unwrap(), ProjectState::Created);
        assert!(notifier.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_failure_after_customer_notified() {
        let store = MemStore {
            fail_transition: true,
            ..MemStore::default()
        };
        let directory = MemDirectory::default();
        let mut users = MemUsers::default();
        let project = pending("fr");
        users
            .emails
            .insert(project.customer_id, "cust@example.com".into());
        let notifier = MemNotifier::default();

        let allocator = Allocator::new(&store, &directory, &users, &notifier);
        let err = allocator.allocate(&project).await.unwrap_err();

        assert_matches!(err, AllocationError::CloseFailed(_));
        // The notification already went out; it is not compensated.
        assert_eq!(notifier.failed.lock().unwrap().len(), 1);
    }
}
