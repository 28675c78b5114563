/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Spot numbers are 1-based and bounded by the lot's `max_spots`.
pub type SpotNumber = i32;
