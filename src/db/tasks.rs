use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{Task, TaskFields, TaskStatus};

/// Task row joined with its image filename, for entry and review screens.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct TaskWithImage {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: TaskStatus,
    pub entry: Option<Json<TaskFields>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub filename: String,
}

pub async fn create_pending<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
    image_id: Uuid,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (project_id, image_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(project_id)
    .bind(image_id)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE project_id = $1 ORDER BY created_at",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn list_with_images(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<Vec<TaskWithImage>, sqlx::Error> {
    sqlx::query_as::<_, TaskWithImage>(
        "SELECT t.id, t.project_id, t.status, t.entry, t.updated_at, i.filename
         FROM tasks t JOIN images i ON t.image_id = i.id
         WHERE t.project_id = $1 ORDER BY t.created_at",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

pub async fn find_with_image(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<TaskWithImage>, sqlx::Error> {
    sqlx::query_as::<_, TaskWithImage>(
        "SELECT t.id, t.project_id, t.status, t.entry, t.updated_at, i.filename
         FROM tasks t JOIN images i ON t.image_id = i.id WHERE t.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn count_by_project<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
        .bind(project_id)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn count_saved<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM tasks WHERE project_id = $1 AND status = 'saved'",
    )
    .bind(project_id)
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}

/// Employee save: record the entry and move the task to Saved. Re-saving
/// an already-saved task is allowed any number of times.
pub async fn save_entry(
    pool: &PgPool,
    id: Uuid,
    fields: &TaskFields,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE tasks SET entry = $2, status = 'saved', updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(Json(fields))
    .execute(pool)
    .await?;
    Ok(())
}

/// Review-path edit: the entry changes, the status does not.
pub async fn update_entry(
    pool: &PgPool,
    id: Uuid,
    fields: &TaskFields,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE tasks SET entry = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(Json(fields))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn mark_all_submitted<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE tasks SET status = 'submitted' WHERE project_id = $1")
        .bind(project_id)
        .execute(executor)
        .await?;
    Ok(())
}
