//! Case lifecycle HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::{SalesOrderService, WorkflowService};
use crate::AppState;
use shared::{CaseState, DocumentType};

/// List all cases
pub async fn list_cases(State(state): State<AppState>) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service.list_cases().await {
        Ok(cases) => (StatusCode::OK, Json(serde_json::json!({ "cases": cases }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific case
pub async fn get_case(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service.get_case(case_id).await {
        Ok(case) => (StatusCode::OK, Json(case)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Chronological state-transition log of a case
pub async fn get_case_transitions(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service.case_transitions(case_id).await {
        Ok(transitions) => (
            StatusCode::OK,
            Json(serde_json::json!({ "transitions": transitions })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Sales orders belonging to a case
pub async fn get_case_sales_orders(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SalesOrderService::new(state.db.clone());

    match service.get_sales_orders_by_case(case_id).await {
        Ok(orders) => (
            StatusCode::OK,
            Json(serde_json::json!({ "sales_orders": orders })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct TransitionCaseRequest {
    pub target_state: String,
    pub trigger_entity_type: String,
    pub trigger_entity_id: Uuid,
}

/// Move a case into a target state, running side effects atomically
pub async fn transition_case(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(case_id): Path<Uuid>,
    Json(body): Json<TransitionCaseRequest>,
) -> impl IntoResponse {
    let target_state = match CaseState::from_str(&body.target_state) {
        Some(s) => s,
        None => {
            return AppError::Validation {
                field: "target_state".to_string(),
                message: format!("unknown case state '{}'", body.target_state),
            }
            .into_response()
        }
    };
    let trigger_entity_type = match DocumentType::from_str(&body.trigger_entity_type) {
        Some(t) => t,
        None => {
            return AppError::Validation {
                field: "trigger_entity_type".to_string(),
                message: format!("unknown document type '{}'", body.trigger_entity_type),
            }
            .into_response()
        }
    };

    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service
        .transition_case(
            case_id,
            trigger_entity_type,
            body.trigger_entity_id,
            target_state,
            current_user.0.user_id,
        )
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
