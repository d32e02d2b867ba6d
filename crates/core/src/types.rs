/// Every entity is keyed by a random v4 UUID.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Position of an item among its siblings. Always `0..n-1` within a container.
pub type Priority = i64;

/// Generate a fresh entity id.
pub fn new_id() -> DbId {
    uuid::Uuid::new_v4()
}
