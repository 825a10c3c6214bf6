//! Enquiry management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::enquiry::{CreateEnquiryInput, EnquiryService, UpdateEnquiryInput};
use crate::AppState;

/// Register a new enquiry, opening its case
pub async fn create_enquiry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateEnquiryInput>,
) -> impl IntoResponse {
    let service = EnquiryService::new(state.db.clone(), state.sequences());

    match service.create_enquiry(input, current_user.0.user_id).await {
        Ok(enquiry) => (StatusCode::CREATED, Json(enquiry)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all enquiries
pub async fn list_enquiries(State(state): State<AppState>) -> impl IntoResponse {
    let service = EnquiryService::new(state.db.clone(), state.sequences());

    match service.list_enquiries().await {
        Ok(enquiries) => (
            StatusCode::OK,
            Json(serde_json::json!({ "enquiries": enquiries })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific enquiry
pub async fn get_enquiry(
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EnquiryService::new(state.db.clone(), state.sequences());

    match service.get_enquiry(enquiry_id).await {
        Ok(enquiry) => (StatusCode::OK, Json(enquiry)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an enquiry's editable fields
pub async fn update_enquiry(
    State(state): State<AppState>,
    Path(enquiry_id): Path<Uuid>,
    Json(input): Json<UpdateEnquiryInput>,
) -> impl IntoResponse {
    let service = EnquiryService::new(state.db.clone(), state.sequences());

    match service.update_enquiry(enquiry_id, input).await {
        Ok(enquiry) => (StatusCode::OK, Json(enquiry)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Archive an enquiry (soft delete)
pub async fn archive_enquiry(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(enquiry_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EnquiryService::new(state.db.clone(), state.sequences());

    match service
        .archive_enquiry(enquiry_id, current_user.0.user_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
