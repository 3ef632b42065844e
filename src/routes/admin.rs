use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::idgen;
use crate::image_pool;
use crate::lifecycle;
use crate::models::{Inquiry, Project, TaskFields, UserRole, UserStatus};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    pub employee_id: Uuid,
    pub task_count: i64,
    pub cost: Decimal,
    pub security_deposit: Decimal,
    pub expiry_days: i64,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct FinalizeRequest {
    pub action: String,
}

/// Admin landing data. Reconciles the image pool first, so freshly
/// dropped scans show up without a separate sync call.
pub async fn dashboard(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let discovered = image_pool::reconcile(&state.pool, &state.config.upload_dir).await?;
    let available_images = db::images::count_unassigned(&state.pool).await?;
    let review_projects = db::projects::list_in_review(&state.pool).await?;
    let active_employees = db::users::list_active_employees(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "newly_discovered": discovered,
        "available_images": available_images,
        "review_projects": review_projects,
        "active_employees": active_employees,
    })))
}

pub async fn sync_images(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;
    let discovered = image_pool::reconcile(&state.pool, &state.config.upload_dir).await?;
    Ok(Json(serde_json::json!({ "discovered": discovered })))
}

pub async fn create_employee(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateEmployee>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let email = req.email.to_lowercase();
    if db::users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "An account with the email '{email}' already exists"
        )));
    }

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let mut tx = state.pool.begin().await?;
    idgen::acquire_seq_lock(&mut *tx, idgen::EMPLOYEE_SEQ_LOCK).await?;

    let code = idgen::next_employee_code(&mut *tx).await?;
    let user = db::users::create(&mut *tx, &code, &req.name, &email, &pw_hash, UserRole::Employee)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(
                    "Employee code or email already in use; identifier allocation raced"
                        .to_string(),
                )
            }
            _ => AppError::Database(e),
        })?;

    tx.commit().await?;

    tracing::info!(employee = %user.employee_code, "employee account created");
    Ok(Json(serde_json::json!({ "employee": user })))
}

pub async fn employee_details(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let employee = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let projects_assigned = db::projects::count_for_employee(&state.pool, id).await?;
    let projects_completed = db::projects::count_completed_for_employee(&state.pool, id).await?;

    Ok(Json(serde_json::json!({
        "employee": employee,
        "projects_assigned": projects_assigned,
        "projects_completed": projects_completed,
    })))
}

pub async fn toggle_employee_status(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if user.role != UserRole::Employee {
        return Err(AppError::BadRequest(
            "Only employee accounts can be toggled".to_string(),
        ));
    }

    let new_status: UserStatus = user.status.toggled();
    db::users::update_status(&state.pool, id, new_status).await?;

    Ok(Json(serde_json::json!({
        "name": user.name,
        "status": new_status,
    })))
}

pub async fn assign(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<Project>, AppError> {
    let request = lifecycle::AssignmentRequest {
        employee_id: req.employee_id,
        task_count: req.task_count,
        cost: req.cost,
        security_deposit: req.security_deposit,
        expiry_days: req.expiry_days,
    };
    let project = lifecycle::assign_project(&state.pool, &auth, &request).await?;
    Ok(Json(project))
}

/// Finalized projects matched on project name or employee code. An empty
/// search term returns nothing rather than the whole history.
pub async fn project_history(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let results = match params.search.as_deref() {
        Some(term) if !term.trim().is_empty() => {
            db::projects::search_history(&state.pool, term.trim()).await?
        }
        _ => Vec::new(),
    };

    Ok(Json(serde_json::json!({ "results": results })))
}

pub async fn review_project(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    let project = db::projects::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    let employee = db::users::find_by_id(&state.pool, project.employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    let tasks = db::tasks::list_with_images(&state.pool, id).await?;

    Ok(Json(serde_json::json!({
        "project": project,
        "employee_name": employee.name,
        "employee_code": employee.employee_code,
        "tasks": tasks,
    })))
}

/// Review-path edit of a task's entry record. The task status is never
/// touched here.
pub async fn update_task(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<TaskFields>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_admin()?;

    db::tasks::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    db::tasks::update_entry(&state.pool, id, &fields).await?;
    Ok(Json(serde_json::json!({ "message": "Task data updated" })))
}

pub async fn finalize(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FinalizeRequest>,
) -> Result<Json<Project>, AppError> {
    let decision = lifecycle::Decision::parse(&req.action)?;
    let project = lifecycle::finalize_project(&state.pool, &auth, id, decision).await?;
    Ok(Json(project))
}

pub async fn list_inquiries(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Inquiry>>, AppError> {
    auth.require_admin()?;
    let inquiries = db::inquiries::list(&state.pool).await?;
    Ok(Json(inquiries))
}
