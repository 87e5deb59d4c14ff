use axum::{extract::State, http::HeaderMap, Json};

use crate::middleware::client_ip;
use crate::models::{LoginRequest, NewAuditLogEntry, User};
use crate::startup::AppState;
use crate::utils::{Password, ValidatedJson};
use service_core::error::AppError;

/// POST /auth/login
///
/// Returns the user on success; the caller keeps its usercode and sends it
/// back as `X-User-Code` on later requests.
#[tracing::instrument(skip(state, headers, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .verify_login(&req.username, &Password::new(req.password))
        .await?
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Invalid username or password")))?;

    state
        .db
        .add_audit_log(
            &NewAuditLogEntry::new(user.usercode, "LOGIN")
                .page("Login")
                .text(format!("User {} signed in", user.username))
                .ip(client_ip(&headers)),
        )
        .await?;

    Ok(Json(user))
}
