/// All primary keys are UUIDs, generated application-side at insert time
/// (v7 for projects so ids sort by creation, v4 elsewhere).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
