use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Saved,
    Submitted,
}

/// The transcription record for one scanned document. The field set is
/// fixed; every field is optional so partial saves round-trip cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFields {
    pub name: Option<String>,
    pub age: Option<String>,
    pub mobile_number: Option<String>,
    pub sex: Option<String>,
    pub address: Option<String>,
    pub receipt_number: Option<String>,
}

/// One image's transcription slot within a project.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub image_id: Uuid,
    pub status: TaskStatus,
    pub entry: Option<Json<TaskFields>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
