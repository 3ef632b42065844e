use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Project, ProjectStatus};

/// Project row joined with the owning employee, for admin listings.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub project_name: String,
    pub status: ProjectStatus,
    pub cost: Decimal,
    pub security_deposit: Decimal,
    pub expiry_date: DateTime<Utc>,
    pub assigned_at: DateTime<Utc>,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub employee_code: String,
}

const SUMMARY_SELECT: &str = "SELECT p.id, p.project_name, p.status, p.cost,
    p.security_deposit, p.expiry_date, p.assigned_at, p.employee_id,
    u.name AS employee_name, u.employee_code
    FROM projects p JOIN users u ON p.employee_id = u.id";

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    project_name: &str,
    employee_id: Uuid,
    cost: Decimal,
    security_deposit: Decimal,
    expiry_date: DateTime<Utc>,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (project_name, employee_id, cost, security_deposit, expiry_date)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(project_name)
    .bind(employee_id)
    .bind(cost)
    .bind(security_deposit)
    .bind(expiry_date)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Ownership-scoped lookup for employee routes.
pub async fn find_owned(
    pool: &PgPool,
    id: Uuid,
    employee_id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE id = $1 AND employee_id = $2",
    )
    .bind(id)
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

/// Tail of the project-name sequence. Length-first ordering keeps the
/// comparison numeric once a counter outgrows its zero padding.
pub async fn last_project_name<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT project_name FROM projects
         ORDER BY length(project_name) DESC, project_name DESC LIMIT 1",
    )
    .fetch_optional(executor)
    .await
}

pub async fn list_in_review(pool: &PgPool) -> Result<Vec<ProjectSummary>, sqlx::Error> {
    sqlx::query_as::<_, ProjectSummary>(&format!(
        "{SUMMARY_SELECT} WHERE p.status = 'in_review' ORDER BY p.assigned_at DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Finalized projects matching a project name or employee code fragment.
pub async fn search_history(
    pool: &PgPool,
    term: &str,
) -> Result<Vec<ProjectSummary>, sqlx::Error> {
    let pattern = format!("%{term}%");
    sqlx::query_as::<_, ProjectSummary>(&format!(
        "{SUMMARY_SELECT} WHERE (p.project_name ILIKE $1 OR u.employee_code ILIKE $1)
         AND p.status IN ('approved', 'rejected') ORDER BY p.assigned_at DESC"
    ))
    .bind(pattern)
    .fetch_all(pool)
    .await
}

pub async fn list_active_for_employee(
    pool: &PgPool,
    employee_id: Uuid,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE employee_id = $1 AND status = 'in_progress'
         ORDER BY assigned_at DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

pub async fn list_completed_for_employee(
    pool: &PgPool,
    employee_id: Uuid,
) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE employee_id = $1
         AND status IN ('in_review', 'approved', 'rejected')
         ORDER BY assigned_at DESC",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

pub async fn count_for_employee(pool: &PgPool, employee_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Projects the employee has moved past data entry (submitted or finalized).
pub async fn count_completed_for_employee(
    pool: &PgPool,
    employee_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM projects WHERE employee_id = $1
         AND status IN ('in_review', 'approved', 'rejected')",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn update_status<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    status: ProjectStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}
