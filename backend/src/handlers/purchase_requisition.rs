//! Purchase requisition HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::purchase_requisition::{
    CreateRequisitionInput, PurchaseRequisitionService,
};
use crate::AppState;

/// Create a draft purchase requisition
pub async fn create_requisition(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateRequisitionInput>,
) -> impl IntoResponse {
    let service = PurchaseRequisitionService::new(state.db.clone(), state.sequences());

    match service.create_requisition(input, current_user.0.user_id).await {
        Ok(requisition) => (StatusCode::CREATED, Json(requisition)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all purchase requisitions
pub async fn list_requisitions(State(state): State<AppState>) -> impl IntoResponse {
    let service = PurchaseRequisitionService::new(state.db.clone(), state.sequences());

    match service.list_requisitions().await {
        Ok(requisitions) => (
            StatusCode::OK,
            Json(serde_json::json!({ "purchase_requisitions": requisitions })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific purchase requisition
pub async fn get_requisition(
    State(state): State<AppState>,
    Path(requisition_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseRequisitionService::new(state.db.clone(), state.sequences());

    match service.get_requisition(requisition_id).await {
        Ok(requisition) => (StatusCode::OK, Json(requisition)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Submit a draft requisition for approval
pub async fn submit_requisition(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(requisition_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseRequisitionService::new(state.db.clone(), state.sequences());

    match service
        .submit_requisition(requisition_id, current_user.0.user_id)
        .await
    {
        Ok(requisition) => (StatusCode::OK, Json(requisition)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Approve a pending requisition
pub async fn approve_requisition(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(requisition_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = PurchaseRequisitionService::new(state.db.clone(), state.sequences());

    match service
        .approve_requisition(requisition_id, current_user.0.user_id)
        .await
    {
        Ok(requisition) => (StatusCode::OK, Json(requisition)).into_response(),
        Err(e) => e.into_response(),
    }
}
