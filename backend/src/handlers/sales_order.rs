//! Sales order HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::{SalesOrderService, WorkflowService};
use crate::AppState;

/// List all sales orders
pub async fn list_sales_orders(State(state): State<AppState>) -> impl IntoResponse {
    let service = SalesOrderService::new(state.db.clone());

    match service.list_sales_orders().await {
        Ok(orders) => (
            StatusCode::OK,
            Json(serde_json::json!({ "sales_orders": orders })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a sales order with its line items
pub async fn get_sales_order(
    State(state): State<AppState>,
    Path(sales_order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SalesOrderService::new(state.db.clone());

    match service.get_sales_order(sales_order_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Approve a sales order, advancing the case and creating the work order
pub async fn approve_sales_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sales_order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = WorkflowService::new(state.db.clone(), state.sequences());

    match service
        .approve_sales_order(sales_order_id, current_user.0.user_id)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
