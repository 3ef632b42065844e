use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Project, ProjectStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Unknown actions are rejected outright, never silently ignored.
    pub fn parse(action: &str) -> Result<Self, AppError> {
        match action {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            other => Err(AppError::BadRequest(format!(
                "Unknown finalize action '{other}'; expected 'approve' or 'reject'"
            ))),
        }
    }
}

/// Employee hands a fully-saved project over for review: project moves to
/// InReview and every task to Submitted, after which tasks are immutable
/// to the employee.
pub async fn submit_project(
    pool: &PgPool,
    employee: &AuthUser,
    project_id: Uuid,
) -> Result<Project, AppError> {
    employee.require_employee()?;

    let mut tx = pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    if project.employee_id != employee.user_id {
        return Err(AppError::NotFound("Project not found".to_string()));
    }
    if project.status != ProjectStatus::InProgress {
        return Err(AppError::StateConflict(
            "Only in-progress projects can be submitted".to_string(),
        ));
    }

    let total = db::tasks::count_by_project(&mut *tx, project_id).await?;
    let saved = db::tasks::count_saved(&mut *tx, project_id).await?;
    if total == 0 {
        return Err(AppError::StateConflict(
            "Project has no tasks to submit".to_string(),
        ));
    }
    if saved < total {
        return Err(AppError::StateConflict(format!(
            "{} of {total} task(s) still need to be saved before submission",
            total - saved
        )));
    }

    db::projects::update_status(&mut *tx, project_id, ProjectStatus::InReview).await?;
    db::tasks::mark_all_submitted(&mut *tx, project_id).await?;

    tx.commit().await?;

    tracing::info!(project = %project.project_name, "project submitted for review");
    Ok(Project {
        status: ProjectStatus::InReview,
        ..project
    })
}

/// Admin verdict on a project under review. Approval credits the
/// employee's wallet by the project cost in the same transaction as the
/// status change; rejection has no monetary effect. Images stay assigned
/// either way.
pub async fn finalize_project(
    pool: &PgPool,
    admin: &AuthUser,
    project_id: Uuid,
    decision: Decision,
) -> Result<Project, AppError> {
    admin.require_admin()?;

    let mut tx = pool.begin().await?;

    let project = db::projects::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    if project.status != ProjectStatus::InReview {
        return Err(AppError::StateConflict(
            "Only projects in review can be finalized".to_string(),
        ));
    }

    let new_status = match decision {
        Decision::Approve => {
            db::users::credit_wallet(&mut *tx, project.employee_id, project.cost).await?;
            ProjectStatus::Approved
        }
        Decision::Reject => ProjectStatus::Rejected,
    };
    db::projects::update_status(&mut *tx, project_id, new_status).await?;

    tx.commit().await?;

    tracing::info!(
        project = %project.project_name,
        decision = ?decision,
        "project finalized"
    );
    Ok(Project {
        status: new_status,
        ..project
    })
}
