//! Quotation management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::quotation::{CreateQuotationInput, QuotationService};
use crate::services::WorkflowService;
use crate::AppState;

/// Create a standalone draft quotation
pub async fn create_quotation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateQuotationInput>,
) -> impl IntoResponse {
    let service = QuotationService::new(state.db.clone(), state.sequences());

    match service.create_quotation(input, current_user.0.user_id).await {
        Ok(quotation) => (StatusCode::CREATED, Json(quotation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all quotations
pub async fn list_quotations(State(state): State<AppState>) -> impl IntoResponse {
    let service = QuotationService::new(state.db.clone(), state.sequences());

    match service.list_quotations().await {
        Ok(quotations) => (
            StatusCode::OK,
            Json(serde_json::json!({ "quotations": quotations })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a quotation with its line items
pub async fn get_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = QuotationService::new(state.db.clone(), state.sequences());

    match service.get_quotation(quotation_id).await {
        Ok(quotation) => (StatusCode::OK, Json(quotation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Submit a draft quotation for approval
pub async fn submit_quotation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = QuotationService::new(state.db.clone(), state.sequences());

    match service
        .submit_quotation(quotation_id, current_user.0.user_id)
        .await
    {
        Ok(quotation) => (StatusCode::OK, Json(quotation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Approve a quotation, advancing the case and creating the sales order
pub async fn approve_quotation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service
        .approve_quotation(quotation_id, current_user.0.user_id)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RejectQuotationRequest {
    pub reason: Option<String>,
}

/// Reject a pending quotation, returning it to draft
pub async fn reject_quotation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(quotation_id): Path<Uuid>,
    Json(body): Json<RejectQuotationRequest>,
) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service
        .reject_quotation(quotation_id, current_user.0.user_id, body.reason.as_deref())
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
