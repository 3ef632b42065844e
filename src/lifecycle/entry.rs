use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{ProjectStatus, TaskFields};

/// Record an employee's transcription for one task and mark it Saved.
/// Re-saving is allowed any number of times while the project stays
/// in progress; expiry is a read-time gate, not a status transition.
pub async fn save_task_data(
    pool: &PgPool,
    employee: &AuthUser,
    task_id: Uuid,
    fields: &TaskFields,
) -> Result<(), AppError> {
    employee.require_employee()?;

    let task = db::tasks::find_by_id(pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    let project = db::projects::find_by_id(pool, task.project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    // Other employees' tasks are indistinguishable from missing ones.
    if project.employee_id != employee.user_id {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    if project.status != ProjectStatus::InProgress {
        return Err(AppError::StateConflict(
            "Project is no longer open for data entry".to_string(),
        ));
    }

    if project.is_expired(Utc::now()) {
        return Err(AppError::Expired(
            "This project has expired; entries can no longer be saved".to_string(),
        ));
    }

    db::tasks::save_entry(pool, task_id, fields).await?;
    Ok(())
}
