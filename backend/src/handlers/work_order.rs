//! Work order HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::work_order::{ScheduleWorkOrderInput, WorkOrderService};
use crate::AppState;

/// List all work orders
pub async fn list_work_orders(State(state): State<AppState>) -> impl IntoResponse {
    let service = WorkOrderService::new(state.db.clone());

    match service.list_work_orders().await {
        Ok(orders) => (
            StatusCode::OK,
            Json(serde_json::json!({ "work_orders": orders })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific work order
pub async fn get_work_order(
    State(state): State<AppState>,
    Path(work_order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WorkOrderService::new(state.db.clone());

    match service.get_work_order(work_order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a work order's schedule and notes
pub async fn schedule_work_order(
    State(state): State<AppState>,
    Path(work_order_id): Path<Uuid>,
    Json(input): Json<ScheduleWorkOrderInput>,
) -> impl IntoResponse {
    let service = WorkOrderService::new(state.db.clone());

    match service.schedule_work_order(work_order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkOrderStatusRequest {
    pub status: String,
}

/// Move a work order to a new status
pub async fn update_work_order_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(work_order_id): Path<Uuid>,
    Json(body): Json<UpdateWorkOrderStatusRequest>,
) -> impl IntoResponse {
    let service = WorkOrderService::new(state.db.clone());

    match service
        .update_status(work_order_id, &body.status, current_user.0.user_id)
        .await
    {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}
