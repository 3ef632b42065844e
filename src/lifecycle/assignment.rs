use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::idgen;
use crate::models::{Project, UserRole, UserStatus};

#[derive(Debug)]
pub struct AssignmentRequest {
    pub employee_id: Uuid,
    pub task_count: i64,
    pub cost: Decimal,
    pub security_deposit: Decimal,
    pub expiry_days: i64,
}

/// Create a project for an employee: pick `task_count` unassigned images,
/// insert the project and one pending task per image, flip the images to
/// assigned. One transaction under the project sequence lock — any
/// failure rolls back the whole thing, so images are never double-claimed
/// and the task count always matches the assigned image count.
pub async fn assign_project(
    pool: &PgPool,
    admin: &AuthUser,
    req: &AssignmentRequest,
) -> Result<Project, AppError> {
    admin.require_admin()?;

    if req.task_count < 1 {
        return Err(AppError::BadRequest(
            "Task count must be at least 1".to_string(),
        ));
    }
    if req.expiry_days < 1 {
        return Err(AppError::BadRequest(
            "Expiry must be at least 1 day".to_string(),
        ));
    }
    if req.cost < Decimal::ZERO || req.security_deposit < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Cost and security deposit cannot be negative".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    idgen::acquire_seq_lock(&mut *tx, idgen::PROJECT_SEQ_LOCK).await?;

    let employee = db::users::find_by_id(&mut *tx, req.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    if employee.role != UserRole::Employee {
        return Err(AppError::BadRequest(
            "Projects can only be assigned to employee accounts".to_string(),
        ));
    }
    if employee.status != UserStatus::Active {
        return Err(AppError::StateConflict(
            "Employee account is inactive".to_string(),
        ));
    }

    let images = db::images::select_unassigned(&mut *tx, req.task_count).await?;
    if (images.len() as i64) < req.task_count {
        return Err(AppError::StateConflict(format!(
            "Only {} image(s) available, {} requested",
            images.len(),
            req.task_count
        )));
    }

    let project_name = idgen::next_project_name(&mut *tx).await?;
    let expiry_date = Utc::now() + Duration::days(req.expiry_days);

    let project = db::projects::create(
        &mut *tx,
        &project_name,
        employee.id,
        req.cost,
        req.security_deposit,
        expiry_date,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::Conflict(
            format!("Project name {project_name} already exists; identifier allocation raced"),
        ),
        _ => AppError::Database(e),
    })?;

    for image in &images {
        db::tasks::create_pending(&mut *tx, project.id, image.id).await?;
        db::images::mark_assigned(&mut *tx, image.id).await?;
    }

    tx.commit().await?;

    tracing::info!(
        project = %project.project_name,
        employee = %employee.employee_code,
        tasks = images.len(),
        "project assigned"
    );
    Ok(project)
}
