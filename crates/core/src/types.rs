/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date with no time-of-day component.
pub type Date = chrono::NaiveDate;

/// Wire format for dates in forms, query strings and JSON (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
