use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    InReview,
    Approved,
    Rejected,
}

/// A batch of data-entry tasks assigned to one employee. Status walks
/// `in_progress -> in_review -> approved | rejected`, never backwards.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub project_name: String,
    pub employee_id: Uuid,
    pub status: ProjectStatus,
    pub cost: Decimal,
    pub security_deposit: Decimal,
    pub expiry_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

impl Project {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date
    }
}
