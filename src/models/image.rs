use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "image_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    Unassigned,
    Assigned,
}

/// A scanned document discovered in the pending-uploads directory.
/// Flips to `assigned` exactly once; never returns to the pool.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Image {
    pub id: Uuid,
    pub filename: String,
    pub status: ImageStatus,
    pub discovered_at: DateTime<Utc>,
}
