pub mod admin;
pub mod auth;
pub mod contact;
pub mod employee;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Contact
        .route("/api/v1/contact", post(contact::submit))
        // Admin
        .route("/api/v1/admin/dashboard", get(admin::dashboard))
        .route("/api/v1/admin/images/sync", post(admin::sync_images))
        .route("/api/v1/admin/employees", post(admin::create_employee))
        .route(
            "/api/v1/admin/employees/{id}",
            get(admin::employee_details),
        )
        .route(
            "/api/v1/admin/employees/{id}/toggle-status",
            post(admin::toggle_employee_status),
        )
        .route("/api/v1/admin/assignments", post(admin::assign))
        .route("/api/v1/admin/projects/history", get(admin::project_history))
        .route("/api/v1/admin/projects/{id}", get(admin::review_project))
        .route(
            "/api/v1/admin/projects/{id}/finalize",
            post(admin::finalize),
        )
        .route("/api/v1/admin/tasks/{id}", put(admin::update_task))
        .route("/api/v1/admin/inquiries", get(admin::list_inquiries))
        // Employee
        .route("/api/v1/employee/dashboard", get(employee::dashboard))
        .route("/api/v1/employee/projects/{id}", get(employee::view_project))
        .route(
            "/api/v1/employee/projects/{id}/submit",
            post(employee::submit),
        )
        .route(
            "/api/v1/employee/tasks/{id}",
            get(employee::view_task).put(employee::save_task),
        )
        .route(
            "/api/v1/employee/profile",
            get(employee::profile).put(employee::update_profile),
        )
        .route(
            "/api/v1/employee/profile/avatar",
            post(employee::upload_avatar),
        )
}
