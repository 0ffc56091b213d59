//! Translator language registrations.
//!
//! Language codes travel as plain strings (`languages_of` returns
//! `Vec<String>`); the only row shape needed is the qualified-translator
//! join used by the allocator.

use sqlx::FromRow;
use traduko_core::types::DbId;

/// A translator qualified for some language, joined with their contact
/// address for assignment notification.
#[derive(Debug, Clone, FromRow)]
pub struct QualifiedTranslatorRow {
    pub id: DbId,
    pub email: String,
}
