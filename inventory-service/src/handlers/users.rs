//! User administration handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{audit_entry, record};
use crate::middleware::CurrentUser;
use crate::models::{CreateUser, Role, UpdateUser, User};
use crate::startup::AppState;
use crate::utils::{Password, ValidatedJson};
use service_core::error::AppError;

const PAGE: &str = "Users";

fn user_not_found(usercode: i32) -> AppError {
    AppError::NotFound(anyhow::anyhow!("User {} not found", usercode))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.db.list_users().await?))
}

/// POST /users
#[tracing::instrument(skip(state, req), fields(user_code = user.user_code, username = %req.username))]
pub async fn create_user(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateUser>,
) -> Result<StatusCode, AppError> {
    if !state
        .db
        .create_user(&req.username, &Password::new(req.password), req.role_id)
        .await?
    {
        return Err(AppError::InternalError(anyhow::anyhow!("User was not created")));
    }

    record(
        &state,
        audit_entry(&user, "CREATE", PAGE)
            .entity("User", req.username.trim())
            .text(format!("Created user {}", req.username.trim())),
    )
    .await?;

    Ok(StatusCode::CREATED)
}

/// PUT /users/:usercode
#[tracing::instrument(skip(state, req), fields(user_code = user.user_code))]
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(usercode): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateUser>,
) -> Result<Json<User>, AppError> {
    if !state
        .db
        .update_user(usercode, &req.username, req.role_id)
        .await?
    {
        return Err(user_not_found(usercode));
    }

    record(&state, audit_entry(&user, "UPDATE", PAGE).entity("User", usercode)).await?;

    state
        .db
        .get_user(usercode)
        .await?
        .map(Json)
        .ok_or_else(|| user_not_found(usercode))
}

/// DELETE /users/:usercode
#[tracing::instrument(skip(state), fields(user_code = user.user_code))]
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(usercode): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.db.delete_user(usercode).await? {
        return Err(user_not_found(usercode));
    }

    record(&state, audit_entry(&user, "DELETE", PAGE).entity("User", usercode)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /roles
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AppError> {
    Ok(Json(state.db.list_roles().await?))
}
