/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Display position of an item within its collection scope.
///
/// Advisory only: values may repeat or leave gaps.
pub type SortOrder = i32;
