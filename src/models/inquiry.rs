use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Contact-form record. Write-once, no lifecycle.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}
