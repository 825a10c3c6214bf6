//! Estimation management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::estimation::{CreateEstimationInput, EstimationService};
use crate::services::WorkflowService;
use crate::AppState;

/// Create a draft estimation under an enquiry
pub async fn create_estimation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateEstimationInput>,
) -> impl IntoResponse {
    let service = EstimationService::new(state.db.clone(), state.sequences());

    match service.create_estimation(input, current_user.0.user_id).await {
        Ok(estimation) => (StatusCode::CREATED, Json(estimation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all estimations
pub async fn list_estimations(State(state): State<AppState>) -> impl IntoResponse {
    let service = EstimationService::new(state.db.clone(), state.sequences());

    match service.list_estimations().await {
        Ok(estimations) => (
            StatusCode::OK,
            Json(serde_json::json!({ "estimations": estimations })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get an estimation with its line items
pub async fn get_estimation(
    State(state): State<AppState>,
    Path(estimation_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EstimationService::new(state.db.clone(), state.sequences());

    match service.get_estimation(estimation_id).await {
        Ok(estimation) => (StatusCode::OK, Json(estimation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Submit a draft estimation for approval
pub async fn submit_estimation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(estimation_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EstimationService::new(state.db.clone(), state.sequences());

    match service
        .submit_estimation(estimation_id, current_user.0.user_id)
        .await
    {
        Ok(estimation) => (StatusCode::OK, Json(estimation)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Approve an estimation, advancing the case and creating the quotation
pub async fn approve_estimation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(estimation_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service
        .approve_estimation(estimation_id, current_user.0.user_id)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
