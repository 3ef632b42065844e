use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::lifecycle;
use crate::models::{BankDetails, Project, ProjectStatus, TaskFields, User};
use crate::state::SharedState;
use crate::uploads;

#[derive(Serialize)]
pub struct ActiveProject {
    #[serde(flatten)]
    pub project: Project,
    pub total_tasks: i64,
    pub saved_tasks: i64,
    pub progress: i32,
    pub is_submittable: bool,
}

pub async fn dashboard(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_employee()?;

    let active = db::projects::list_active_for_employee(&state.pool, auth.user_id).await?;
    let mut active_projects = Vec::with_capacity(active.len());
    for project in active {
        let total = db::tasks::count_by_project(&state.pool, project.id).await?;
        let saved = db::tasks::count_saved(&state.pool, project.id).await?;
        active_projects.push(ActiveProject {
            total_tasks: total,
            saved_tasks: saved,
            progress: lifecycle::progress_percent(saved, total),
            is_submittable: total > 0 && saved == total,
            project,
        });
    }

    let completed_projects =
        db::projects::list_completed_for_employee(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "active_projects": active_projects,
        "completed_projects": completed_projects,
    })))
}

/// Task list of one of the caller's in-progress projects.
pub async fn view_project(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_employee()?;

    let project = db::projects::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    if project.status != ProjectStatus::InProgress {
        return Err(AppError::StateConflict(
            "Project is no longer open for data entry".to_string(),
        ));
    }

    let tasks = db::tasks::list_with_images(&state.pool, id).await?;

    Ok(Json(serde_json::json!({
        "project": project,
        "tasks": tasks,
    })))
}

pub async fn view_task(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_employee()?;

    let task = db::tasks::find_with_image(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    let project = db::projects::find_owned(&state.pool, task.project_id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
    if project.status != ProjectStatus::InProgress {
        return Err(AppError::StateConflict(
            "Task is no longer open for data entry".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({
        "task": task,
        "expiry_date": project.expiry_date,
    })))
}

pub async fn save_task(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<TaskFields>,
) -> Result<Json<serde_json::Value>, AppError> {
    lifecycle::save_task_data(&state.pool, &auth, id, &fields).await?;
    Ok(Json(serde_json::json!({ "message": "Task progress saved" })))
}

pub async fn submit(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = lifecycle::submit_project(&state.pool, &auth, id).await?;
    Ok(Json(project))
}

pub async fn profile(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<User>, AppError> {
    auth.require_employee()?;
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct UpdateProfile {
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub designation: Option<String>,
    #[serde(default)]
    pub bank_details: BankDetails,
}

pub async fn update_profile(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<UpdateProfile>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_employee()?;

    db::users::update_profile(
        &state.pool,
        auth.user_id,
        req.phone_number.as_deref(),
        req.gender.as_deref(),
        req.date_of_birth,
        req.designation.as_deref(),
        &req.bank_details,
    )
    .await?;

    Ok(Json(serde_json::json!({ "message": "Profile updated" })))
}

/// Multipart avatar upload; the stored name is prefixed with the user id
/// and sanitized before it touches the filesystem.
pub async fn upload_avatar(
    auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_employee()?;

    let upload = uploads::parse_image_field(&headers, body, "profile_pic").await?;
    let filename = format!(
        "user_{}_{}",
        auth.user_id,
        uploads::sanitize_filename(&upload.original_name)
    );

    uploads::save_to(&state.config.avatar_dir, &filename, &upload.bytes).await?;
    db::users::set_profile_picture(&state.pool, auth.user_id, &filename).await?;

    Ok(Json(serde_json::json!({ "profile_picture": filename })))
}
