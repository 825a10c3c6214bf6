//! Support ticket HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::ticket::{CreateTicketInput, TicketService};
use crate::AppState;

/// Raise a new ticket
pub async fn create_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTicketInput>,
) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service.create_ticket(input, current_user.0.user_id).await {
        Ok(ticket) => (StatusCode::CREATED, Json(ticket)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all tickets
pub async fn list_tickets(State(state): State<AppState>) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service.list_tickets().await {
        Ok(tickets) => (
            StatusCode::OK,
            Json(serde_json::json!({ "tickets": tickets })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific ticket
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service.get_ticket(ticket_id).await {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: String,
}

/// Move a ticket to a new status
pub async fn update_ticket_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<UpdateTicketStatusRequest>,
) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service
        .update_status(ticket_id, &body.status, current_user.0.user_id)
        .await
    {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignTicketRequest {
    pub assigned_to: Option<Uuid>,
}

/// Assign or reassign a ticket
pub async fn assign_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AssignTicketRequest>,
) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service
        .assign_ticket(ticket_id, body.assigned_to, current_user.0.user_id)
        .await
    {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTicketNoteRequest {
    pub note: String,
}

/// Append a note to a ticket
pub async fn add_ticket_note(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AddTicketNoteRequest>,
) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service
        .add_note(ticket_id, &body.note, current_user.0.user_id)
        .await
    {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Notes on a ticket, oldest first
pub async fn get_ticket_notes(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = TicketService::new(state.db.clone(), state.sequences());

    match service.get_notes(ticket_id).await {
        Ok(notes) => (StatusCode::OK, Json(serde_json::json!({ "notes": notes }))).into_response(),
        Err(e) => e.into_response(),
    }
}
