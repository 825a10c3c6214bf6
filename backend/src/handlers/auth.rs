//! Authentication handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::services::auth::{AuthService, LoginInput, RegisterInput};
use crate::AppState;

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.db.clone(), state.config.jwt.clone());

    match service.register(input).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Log in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> impl IntoResponse {
    let service = AuthService::new(state.db.clone(), state.config.jwt.clone());

    match service.login(input).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}
