//! Route definitions for the Sales Workflow Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - case lifecycle
        .nest("/cases", case_routes())
        // Protected routes - enquiry management
        .nest("/enquiries", enquiry_routes())
        // Protected routes - estimations
        .nest("/estimations", estimation_routes())
        // Protected routes - quotations
        .nest("/quotations", quotation_routes())
        // Protected routes - sales orders
        .nest("/sales-orders", sales_order_routes())
        // Protected routes - work orders
        .nest("/work-orders", work_order_routes())
        // Protected routes - purchase requisitions
        .nest("/purchase-requisitions", purchase_requisition_routes())
        // Protected routes - support tickets
        .nest("/tickets", ticket_routes())
        // Protected routes - audit history
        .nest("/history", history_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

/// Case lifecycle routes (protected)
fn case_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_cases))
        .route("/:case_id", get(handlers::get_case))
        .route("/:case_id/transitions", get(handlers::get_case_transitions))
        .route("/:case_id/transition", post(handlers::transition_case))
        .route("/:case_id/sales-orders", get(handlers::get_case_sales_orders))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Enquiry management routes (protected)
fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_enquiries).post(handlers::create_enquiry),
        )
        .route(
            "/:enquiry_id",
            get(handlers::get_enquiry)
                .put(handlers::update_enquiry)
                .delete(handlers::archive_enquiry),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Estimation routes (protected)
fn estimation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_estimations).post(handlers::create_estimation),
        )
        .route("/:estimation_id", get(handlers::get_estimation))
        .route("/:estimation_id/submit", post(handlers::submit_estimation))
        .route("/:estimation_id/approve", post(handlers::approve_estimation))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Quotation routes (protected)
fn quotation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_quotations).post(handlers::create_quotation),
        )
        .route("/:quotation_id", get(handlers::get_quotation))
        .route("/:quotation_id/submit", post(handlers::submit_quotation))
        .route("/:quotation_id/approve", post(handlers::approve_quotation))
        .route("/:quotation_id/reject", post(handlers::reject_quotation))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sales order routes (protected)
fn sales_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales_orders))
        .route("/:sales_order_id", get(handlers::get_sales_order))
        .route(
            "/:sales_order_id/approve",
            post(handlers::approve_sales_order),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Work order routes (protected)
fn work_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_work_orders))
        .route("/:work_order_id", get(handlers::get_work_order))
        .route(
            "/:work_order_id/schedule",
            put(handlers::schedule_work_order),
        )
        .route(
            "/:work_order_id/status",
            post(handlers::update_work_order_status),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase requisition routes (protected)
fn purchase_requisition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_requisitions).post(handlers::create_requisition),
        )
        .route("/:requisition_id", get(handlers::get_requisition))
        .route("/:requisition_id/submit", post(handlers::submit_requisition))
        .route(
            "/:requisition_id/approve",
            post(handlers::approve_requisition),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Support ticket routes (protected)
fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/:ticket_id", get(handlers::get_ticket))
        .route("/:ticket_id/status", post(handlers::update_ticket_status))
        .route("/:ticket_id/assign", post(handlers::assign_ticket))
        .route(
            "/:ticket_id/notes",
            get(handlers::get_ticket_notes).post(handlers::add_ticket_note),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Audit history routes (protected)
fn history_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:entity_type/:entity_id",
            get(handlers::get_entity_history),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
