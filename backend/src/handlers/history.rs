//! Audit history HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::HistoryService;
use crate::AppState;
use shared::DocumentType;

/// History entries for one entity, oldest first
pub async fn get_entity_history(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> impl IntoResponse {
    let entity_type = match DocumentType::from_str(&entity_type) {
        Some(t) => t,
        None => {
            return AppError::Validation {
                field: "entity_type".to_string(),
                message: format!("unknown document type '{}'", entity_type),
            }
            .into_response()
        }
    };

    let service = HistoryService::new(state.db.clone());

    match service.entries_for(entity_type, entity_id).await {
        Ok(entries) => (
            StatusCode::OK,
            Json(serde_json::json!({ "history": entries })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
