//! Postgres-backed implementations of the core allocator traits.
//!
//! These adapt the stateless repositories to the injected-collaborator
//! interfaces the [`traduko_core::allocator::Allocator`] consumes. sqlx
//! failures are logged here and surfaced as `CoreError::Internal`; a
//! compare-and-swap miss surfaces as `CoreError::InvalidState`.

use async_trait::async_trait;
use traduko_core::allocator::{ProjectStore, QualifiedTranslator, TranslatorDirectory, UserLookup};
use traduko_core::error::CoreError;
use traduko_core::state::ProjectState;
use traduko_core::types::DbId;

use crate::repositories::{ProjectRepo, TranslatorLanguageRepo, UserRepo};
use crate::DbPool;

fn internal(context: &str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, context, "database operation failed");
    CoreError::Internal(format!("{context}: {err}"))
}

/// [`ProjectStore`] over a `PgPool`.
#[derive(Clone)]
pub struct PgProjectStore {
    pool: DbPool,
}

impl PgProjectStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn assign_translator(&self, project: DbId, translator: DbId) -> Result<(), CoreError> {
        let updated = ProjectRepo::assign_translator(&self.pool, project, translator)
            .await
            .map_err(|e| internal("assign translator", e))?;
        if updated {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Project",
                id: project,
            })
        }
    }

    async fn transition(
        &self,
        project: DbId,
        from: ProjectState,
        to: ProjectState,
    ) -> Result<(), CoreError> {
        let moved = ProjectRepo::transition(&self.pool, project, from, to)
            .await
            .map_err(|e| internal("project state transition", e))?;
        if moved {
            Ok(())
        } else {
            Err(CoreError::InvalidState(format!(
                "project {project} is no longer in {from}"
            )))
        }
    }
}

/// [`TranslatorDirectory`] over a `PgPool`.
#[derive(Clone)]
pub struct PgTranslatorDirectory {
    pool: DbPool,
}

impl PgTranslatorDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TranslatorDirectory for PgTranslatorDirectory {
    async fn pick_for_language(
        &self,
        code: &str,
    ) -> Result<Option<QualifiedTranslator>, CoreError> {
        let row = TranslatorLanguageRepo::pick_for_language(&self.pool, code)
            .await
            .map_err(|e| internal("qualified translator lookup", e))?;
        Ok(row.map(|r| QualifiedTranslator {
            id: r.id,
            email: r.email,
        }))
    }
}

/// [`UserLookup`] over a `PgPool`.
#[derive(Clone)]
pub struct PgUserLookup {
    pool: DbPool,
}

impl PgUserLookup {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserLookup for PgUserLookup {
    async fn email_of(&self, user: DbId) -> Result<Option<String>, CoreError> {
        let found = UserRepo::find_by_id(&self.pool, user)
            .await
            .map_err(|e| internal("user email lookup", e))?;
        Ok(found.map(|u| u.email))
    }
}
