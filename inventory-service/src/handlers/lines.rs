//! Incoming document line handlers.
//!
//! Line writes never touch the header totals; clients call the
//! recalculate endpoint when they are done editing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{audit_entry, record, CreatedResponse};
use crate::middleware::CurrentUser;
use crate::models::DocumentLineInput;
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use service_core::error::AppError;

const PAGE: &str = "IncomingDocuments";

fn line_not_found(id: i32) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Document line {} not found", id))
}

/// POST /incoming-document-lines
#[tracing::instrument(skip(state, input), fields(user_code = user.user_code))]
pub async fn create_line(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(input): ValidatedJson<DocumentLineInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = state.db.create_document_line(&input).await?;

    record(
        &state,
        audit_entry(&user, "CREATE", PAGE)
            .entity("IncomingDocumentLine", id)
            .text(format!(
                "Added product {} to {}",
                input.product_id,
                input.document_number.trim()
            )),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /incoming-document-lines/:id
#[tracing::instrument(skip(state, input), fields(user_code = user.user_code))]
pub async fn update_line(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<DocumentLineInput>,
) -> Result<StatusCode, AppError> {
    if !state.db.update_document_line(id, &input).await? {
        return Err(line_not_found(id));
    }

    record(
        &state,
        audit_entry(&user, "UPDATE", PAGE).entity("IncomingDocumentLine", id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /incoming-document-lines/:id
#[tracing::instrument(skip(state), fields(user_code = user.user_code))]
pub async fn delete_line(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.db.delete_document_line(id).await? {
        return Err(line_not_found(id));
    }

    record(
        &state,
        audit_entry(&user, "DELETE", PAGE).entity("IncomingDocumentLine", id),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
