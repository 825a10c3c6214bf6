//! Sales Workflow Management Platform - Backend
//!
//! Tracks the sales-to-production lifecycle of a manufacturing business:
//! enquiry, estimation, quotation, sales order, work order and support
//! tickets, with workflow-driven approvals and audited state transitions.

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    /// Sequence allocator configured from the workflow settings
    pub fn sequences(&self) -> services::SequenceService {
        services::SequenceService::new(
            self.db.clone(),
            self.config.workflow.org_prefix.clone(),
            self.config.workflow.fiscal_start_month,
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Sales Workflow Management Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
