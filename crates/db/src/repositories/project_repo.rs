//! Repository for the `projects` table.
//!
//! State transitions are compare-and-swap updates: the `WHERE` clause pins
//! the expected current state, so a concurrent transition makes the update
//! affect zero rows instead of clobbering the newer state.

use sqlx::PgPool;
use traduko_core::state::ProjectState;
use traduko_core::types::DbId;
use uuid::Uuid;

use crate::models::project::Project;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, translator_id, language_code, \
                       original_file_key, translated_file_key, state, created_at";

/// Provides CRUD operations and guarded state transitions for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in CREATED state, returning the created row.
    ///
    /// Ids are UUIDv7 so project listings sort by creation without an
    /// extra column.
    pub async fn create(
        pool: &PgPool,
        customer_id: DbId,
        language_code: &str,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, customer_id, language_code)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(Uuid::now_v7())
            .bind(customer_id)
            .bind(language_code)
            .fetch_one(pool)
            .await
    }

    /// All projects, newest first (administrator listings).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All projects owned by a customer, newest first.
    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE customer_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// A customer's projects currently in `state`, newest first.
    pub async fn list_by_customer_and_state(
        pool: &PgPool,
        customer_id: DbId,
        state: ProjectState,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE customer_id = $1 AND state = $2 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(customer_id)
            .bind(state.as_str())
            .fetch_all(pool)
            .await
    }

    /// All projects assigned to a translator, newest first.
    pub async fn list_by_translator(
        pool: &PgPool,
        translator_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE translator_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(translator_id)
            .fetch_all(pool)
            .await
    }

    /// A translator's projects currently in `state`, newest first.
    pub async fn list_by_translator_and_state(
        pool: &PgPool,
        translator_id: DbId,
        state: ProjectState,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE translator_id = $1 AND state = $2 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(translator_id)
            .bind(state.as_str())
            .fetch_all(pool)
            .await
    }

    /// A translator's past work: everything no longer sitting in `state`.
    pub async fn list_by_translator_excluding_state(
        pool: &PgPool,
        translator_id: DbId,
        state: ProjectState,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE translator_id = $1 AND state <> $2 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(translator_id)
            .bind(state.as_str())
            .fetch_all(pool)
            .await
    }

    /// All projects in `state` across all customers (administrator view).
    pub async fn list_by_state(
        pool: &PgPool,
        state: ProjectState,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE state = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(state.as_str())
            .fetch_all(pool)
            .await
    }

    /// Record the translator assignment. Returns `false` if the project
    /// does not exist.
    pub async fn assign_translator(
        pool: &PgPool,
        id: DbId,
        translator_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET translator_id = $2 WHERE id = $1")
            .bind(id)
            .bind(translator_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Compare-and-swap state transition.
    ///
    /// Returns `true` when the row was in `from` and is now in `to`; `false`
    /// when the project is missing or a concurrent request moved it first.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: ProjectState,
        to: ProjectState,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET state = $3 WHERE id = $1 AND state = $2")
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point the project at its uploaded original file.
    pub async fn set_original_file_key(
        pool: &PgPool,
        id: DbId,
        key: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET original_file_key = $2 WHERE id = $1")
            .bind(id)
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point the project at its uploaded translated file.
    pub async fn set_translated_file_key(
        pool: &PgPool,
        id: DbId,
        key: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET translated_file_key = $2 WHERE id = $1")
            .bind(id)
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project, owner-gated at the SQL level as well. Returns
    /// `true` if a row was removed.
    pub async fn delete_owned(
        pool: &PgPool,
        id: DbId,
        customer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND customer_id = $2")
            .bind(id)
            .bind(customer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
