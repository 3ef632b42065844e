use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub mobile_number: Option<String>,
    pub message: String,
}

/// Contact-form submission. Requires a signed-in user, like the rest of
/// the app; the inquiry itself is write-once with no lifecycle.
pub async fn submit(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.name.is_empty() || req.email.is_empty() || req.message.is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    db::inquiries::create(
        &state.pool,
        &req.name,
        &req.email,
        req.mobile_number.as_deref(),
        &req.message,
    )
    .await?;

    Ok(Json(serde_json::json!({ "message": "Your query has been received!" })))
}
