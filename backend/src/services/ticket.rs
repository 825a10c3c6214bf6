//! Support ticket management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{HistoryService, SequenceService};
use shared::{DocumentType, Ticket, TicketNote, TicketPriority, TicketStatus};

/// Ticket service
#[derive(Clone)]
pub struct TicketService {
    db: PgPool,
    sequences: SequenceService,
    history: HistoryService,
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    ticket_number: String,
    case_id: Option<Uuid>,
    subject: String,
    description: Option<String>,
    priority: String,
    status: String,
    raised_by: Uuid,
    assigned_to: Option<Uuid>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = AppError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status = TicketStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unknown ticket status '{}' in store", row.status))
        })?;
        let priority = TicketPriority::from_str(&row.priority).ok_or_else(|| {
            AppError::Internal(format!("unknown ticket priority '{}' in store", row.priority))
        })?;
        Ok(Ticket {
            id: row.id,
            ticket_number: row.ticket_number,
            case_id: row.case_id,
            subject: row.subject,
            description: row.description,
            priority,
            status,
            raised_by: row.raised_by,
            assigned_to: row.assigned_to,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TICKET_COLUMNS: &str = "id, ticket_number, case_id, subject, description, priority, \
                              status, raised_by, assigned_to, archived, created_at, updated_at";

/// Input for raising a ticket
#[derive(Debug, Deserialize)]
pub struct CreateTicketInput {
    pub case_id: Option<Uuid>,
    pub subject: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TicketPriority,
    pub assigned_to: Option<Uuid>,
}

impl TicketService {
    /// Create a new TicketService instance
    pub fn new(db: PgPool, sequences: SequenceService) -> Self {
        let history = HistoryService::new(db.clone());
        Self {
            db,
            sequences,
            history,
        }
    }

    /// Raise a new ticket in the open status
    pub async fn create_ticket(
        &self,
        input: CreateTicketInput,
        actor_id: Uuid,
    ) -> AppResult<Ticket> {
        if input.subject.trim().is_empty() {
            return Err(AppError::Validation {
                field: "subject".to_string(),
                message: "Subject cannot be empty".to_string(),
            });
        }

        if let Some(case_id) = input.case_id {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cases WHERE id = $1")
                .bind(case_id)
                .fetch_one(&self.db)
                .await?;
            if exists == 0 {
                return Err(AppError::NotFound("Case".to_string()));
            }
        }

        let mut tx = self.db.begin().await?;

        let ticket_number = self
            .sequences
            .next_document_number_in(&mut tx, DocumentType::Ticket)
            .await?;

        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            INSERT INTO tickets
                (ticket_number, case_id, subject, description, priority, status, raised_by, assigned_to)
            VALUES ($1, $2, $3, $4, $5, 'open', $6, $7)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(&ticket_number)
        .bind(input.case_id)
        .bind(&input.subject)
        .bind(&input.description)
        .bind(input.priority.as_str())
        .bind(actor_id)
        .bind(input.assigned_to)
        .fetch_one(&mut *tx)
        .await?;

        self.history
            .record_in(&mut tx, DocumentType::Ticket, row.id, "created", None, actor_id)
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Move a ticket to a new status, checked against the allowed moves
    pub async fn update_status(
        &self,
        ticket_id: Uuid,
        target: &str,
        actor_id: Uuid,
    ) -> AppResult<Ticket> {
        let target_status = match TicketStatus::from_str(target) {
            Some(status) => status,
            None => {
                let msg = shared::validate_status(DocumentType::Ticket, target)
                    .err()
                    .unwrap_or_else(|| format!("invalid status '{}'", target));
                return Err(AppError::ValidationError(msg));
            }
        };

        let existing = self.get_ticket(ticket_id).await?;

        if !existing.status.can_move_to(target_status) {
            return Err(AppError::InvalidStateTransition(format!(
                "ticket cannot move from '{}' to '{}'",
                existing.status, target_status
            )));
        }

        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            UPDATE tickets
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(target_status.as_str())
        .bind(ticket_id)
        .bind(existing.status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Conflict {
            resource: "ticket".to_string(),
            message: format!(
                "ticket was concurrently modified, no longer in '{}'",
                existing.status
            ),
        })?;

        self.history
            .record_best_effort(
                DocumentType::Ticket,
                ticket_id,
                target_status.as_str(),
                None,
                actor_id,
            )
            .await;

        row.try_into()
    }

    /// Assign or reassign a ticket
    pub async fn assign_ticket(
        &self,
        ticket_id: Uuid,
        assignee: Option<Uuid>,
        actor_id: Uuid,
    ) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            r#"
            UPDATE tickets
            SET assigned_to = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            TICKET_COLUMNS
        ))
        .bind(assignee)
        .bind(ticket_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket".to_string()))?;

        self.history
            .record_best_effort(DocumentType::Ticket, ticket_id, "assigned", None, actor_id)
            .await;

        row.try_into()
    }

    /// Append a free-text note to a ticket
    pub async fn add_note(
        &self,
        ticket_id: Uuid,
        note: &str,
        actor_id: Uuid,
    ) -> AppResult<TicketNote> {
        if note.trim().is_empty() {
            return Err(AppError::Validation {
                field: "note".to_string(),
                message: "Note cannot be empty".to_string(),
            });
        }

        // Confirm the ticket exists so the caller gets a 404, not an FK error
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tickets WHERE id = $1")
            .bind(ticket_id)
            .fetch_one(&self.db)
            .await?;
        if exists == 0 {
            return Err(AppError::NotFound("Ticket".to_string()));
        }

        let (id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            r#"
            INSERT INTO ticket_notes (ticket_id, note, actor_id)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(ticket_id)
        .bind(note)
        .bind(actor_id)
        .fetch_one(&self.db)
        .await?;

        self.history
            .record_best_effort(DocumentType::Ticket, ticket_id, "note_added", None, actor_id)
            .await;

        Ok(TicketNote {
            id,
            ticket_id,
            note: note.to_string(),
            actor_id,
            created_at,
        })
    }

    /// Get a ticket by ID
    pub async fn get_ticket(&self, ticket_id: Uuid) -> AppResult<Ticket> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(ticket_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket".to_string()))?;

        row.try_into()
    }

    /// Notes on a ticket, oldest first
    pub async fn get_notes(&self, ticket_id: Uuid) -> AppResult<Vec<TicketNote>> {
        let notes = sqlx::query_as::<_, (Uuid, Uuid, String, Uuid, DateTime<Utc>)>(
            r#"
            SELECT id, ticket_id, note, actor_id, created_at
            FROM ticket_notes
            WHERE ticket_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(ticket_id)
        .fetch_all(&self.db)
        .await?;

        Ok(notes
            .into_iter()
            .map(|(id, ticket_id, note, actor_id, created_at)| TicketNote {
                id,
                ticket_id,
                note,
                actor_id,
                created_at,
            })
            .collect())
    }

    /// List all non-archived tickets, newest first
    pub async fn list_tickets(&self) -> AppResult<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE archived = FALSE ORDER BY created_at DESC",
            TICKET_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}
