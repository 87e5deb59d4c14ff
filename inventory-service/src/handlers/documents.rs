//! Incoming document header handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{audit_entry, record, take_or};
use crate::middleware::CurrentUser;
use crate::models::{DocumentHeader, DocumentHeaderInput, DocumentLine, ListDocumentHeadersFilter};
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use service_core::error::AppError;

const PAGE: &str = "IncomingDocuments";

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub search: Option<String>,
    pub take: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NumberExistsQuery {
    #[serde(default)]
    pub number: String,
    pub exclude_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct NumberExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct NextNumberResponse {
    pub document_number: String,
}

fn not_found_number(number: &str) -> AppError {
    AppError::NotFound(anyhow::anyhow!("Document '{}' not found", number.trim()))
}

/// GET /incoming-documents
#[tracing::instrument(skip(state))]
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Result<Json<Vec<DocumentHeader>>, AppError> {
    let filter = ListDocumentHeadersFilter {
        search: query.search,
        take: take_or(query.take, state.config.default_list_take),
    };
    let headers = state.db.list_document_headers(&filter).await?;
    Ok(Json(headers))
}

/// POST /incoming-documents
///
/// A blank document number is replaced by the next generated one.
#[tracing::instrument(skip(state, input), fields(user_code = user.user_code))]
pub async fn create_document(
    State(state): State<AppState>,
    user: CurrentUser,
    ValidatedJson(mut input): ValidatedJson<DocumentHeaderInput>,
) -> Result<(StatusCode, Json<DocumentHeader>), AppError> {
    if input.document_number.trim().is_empty() {
        input.document_number = state.db.next_document_number().await?;
    } else if state.db.document_number_exists(&input.document_number).await? {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Document number '{}' already exists",
            input.document_number.trim()
        )));
    }

    let id = state.db.create_document_header(&input).await?;
    let header = state
        .db
        .get_document_header(id)
        .await?
        .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Created document {} vanished", id)))?;

    record(
        &state,
        audit_entry(&user, "CREATE", PAGE)
            .entity("IncomingDocumentHeader", id)
            .text(format!("Created incoming document {}", header.document_number)),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(header)))
}

/// GET /incoming-documents/next-number
pub async fn next_number(
    State(state): State<AppState>,
) -> Result<Json<NextNumberResponse>, AppError> {
    let document_number = state.db.next_document_number().await?;
    Ok(Json(NextNumberResponse { document_number }))
}

/// GET /incoming-documents/number-exists
pub async fn number_exists(
    State(state): State<AppState>,
    Query(query): Query<NumberExistsQuery>,
) -> Result<Json<NumberExistsResponse>, AppError> {
    let exists = match query.exclude_id {
        Some(id) => state.db.document_number_exists_for_other(id, &query.number).await?,
        None => state.db.document_number_exists(&query.number).await?,
    };
    Ok(Json(NumberExistsResponse { exists }))
}

/// GET /incoming-documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DocumentHeader>, AppError> {
    state
        .db
        .get_document_header(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document {} not found", id)))
}

/// PUT /incoming-documents/:id
#[tracing::instrument(skip(state, input), fields(user_code = user.user_code))]
pub async fn update_document(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    ValidatedJson(input): ValidatedJson<DocumentHeaderInput>,
) -> Result<Json<DocumentHeader>, AppError> {
    if input.document_number.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Document number is required.")));
    }

    if state
        .db
        .document_number_exists_for_other(id, &input.document_number)
        .await?
    {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Document number '{}' already exists",
            input.document_number.trim()
        )));
    }

    if !state.db.update_document_header(id, &input).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Document {} not found", id)));
    }

    record(
        &state,
        audit_entry(&user, "UPDATE", PAGE)
            .entity("IncomingDocumentHeader", id)
            .text(format!("Updated incoming document {}", input.document_number.trim())),
    )
    .await?;

    get_document(State(state), Path(id)).await
}

/// GET /incoming-documents/by-number/:number
pub async fn get_document_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<DocumentHeader>, AppError> {
    state
        .db
        .get_document_header_by_number(&number)
        .await?
        .map(Json)
        .ok_or_else(|| not_found_number(&number))
}

/// GET /incoming-documents/by-number/:number/lines
pub async fn list_document_lines(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<Vec<DocumentLine>>, AppError> {
    let lines = state.db.list_document_lines(&number).await?;
    Ok(Json(lines))
}

/// POST /incoming-documents/by-number/:number/recalculate
#[tracing::instrument(skip(state), fields(user_code = user.user_code))]
pub async fn recalculate_document(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(number): Path<String>,
) -> Result<Json<DocumentHeader>, AppError> {
    if !state.db.recalculate_document_totals(&number).await? {
        return Err(not_found_number(&number));
    }

    record(
        &state,
        audit_entry(&user, "RECALCULATE", PAGE)
            .entity("IncomingDocumentHeader", number.trim())
            .text(format!("Recalculated totals of {}", number.trim())),
    )
    .await?;

    get_document_by_number(State(state), Path(number)).await
}
