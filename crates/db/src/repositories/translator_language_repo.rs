//! Repository for the `translator_languages` table.
//!
//! Registration is idempotent in both directions: adding an existing pair
//! is a no-op (`ON CONFLICT DO NOTHING`), as is removing an absent one.

use sqlx::PgPool;
use traduko_core::types::DbId;

use crate::models::translator_language::QualifiedTranslatorRow;

/// Registration insert; the unique (translator_id, language_code) pair plus
/// `ON CONFLICT DO NOTHING` makes re-registration a no-op.
const ADD_LANGUAGES_SQL: &str = "INSERT INTO translator_languages (translator_id, language_code)
     SELECT $1, unnest($2::text[])
     ON CONFLICT DO NOTHING";

/// Deregistration delete; absent pairs simply match nothing.
const REMOVE_LANGUAGES_SQL: &str = "DELETE FROM translator_languages
     WHERE translator_id = $1 AND language_code = ANY($2)";

/// Provides language registration and qualified-translator lookup.
pub struct TranslatorLanguageRepo;

impl TranslatorLanguageRepo {
    /// Register each code for the translator. Duplicate pairs are no-ops.
    pub async fn add_languages(
        pool: &PgPool,
        translator_id: DbId,
        codes: &[String],
    ) -> Result<(), sqlx::Error> {
        if codes.is_empty() {
            return Ok(());
        }
        sqlx::query(ADD_LANGUAGES_SQL)
            .bind(translator_id)
            .bind(codes)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Deregister each code for the translator. Absent pairs are no-ops.
    pub async fn remove_languages(
        pool: &PgPool,
        translator_id: DbId,
        codes: &[String],
    ) -> Result<(), sqlx::Error> {
        if codes.is_empty() {
            return Ok(());
        }
        sqlx::query(REMOVE_LANGUAGES_SQL)
            .bind(translator_id)
            .bind(codes)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// All language codes currently registered for a translator.
    pub async fn languages_of(
        pool: &PgPool,
        translator_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT language_code FROM translator_languages
             WHERE translator_id = $1 ORDER BY language_code",
        )
        .bind(translator_id)
        .fetch_all(pool)
        .await
    }

    /// One translator registered for `code`, chosen uniformly at random.
    ///
    /// Pure random selection from the qualified set; deliberately no
    /// weighting by load or past assignments.
    pub async fn pick_for_language(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<QualifiedTranslatorRow>, sqlx::Error> {
        sqlx::query_as::<_, QualifiedTranslatorRow>(
            "SELECT u.id, u.email
             FROM translator_languages tl
             JOIN users u ON u.id = tl.translator_id
             WHERE tl.language_code = $1
             ORDER BY random()
             LIMIT 1",
        )
        .bind(code)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registering_a_pair_twice_keeps_a_single_row() {
        // The unique index on (translator_id, language_code) plus this
        // conflict clause is what makes repeated registration a no-op.
        assert!(
            ADD_LANGUAGES_SQL.contains("ON CONFLICT DO NOTHING"),
            "registration must swallow duplicate pairs"
        );
    }

    #[test]
    fn deregistering_matches_pairs_exactly() {
        // Deleting by translator + ANY(codes) means absent codes match
        // nothing instead of erroring.
        assert!(REMOVE_LANGUAGES_SQL.contains("language_code = ANY($2)"));
        assert!(REMOVE_LANGUAGES_SQL.contains("translator_id = $1"));
    }
}
