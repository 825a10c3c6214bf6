//! Enquiry management service
//!
//! An enquiry is the first record of a case: creating one also creates the
//! owning case in the estimation stage, in the same transaction.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{HistoryService, SequenceService};
use shared::{validate_email, CaseState, DocumentType, Enquiry};

/// Enquiry service
#[derive(Clone)]
pub struct EnquiryService {
    db: PgPool,
    sequences: SequenceService,
    history: HistoryService,
}

#[derive(Debug, sqlx::FromRow)]
struct EnquiryRow {
    id: Uuid,
    enquiry_number: String,
    case_id: Uuid,
    customer_name: String,
    contact_email: Option<String>,
    subject: String,
    details: Option<String>,
    created_by: Uuid,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnquiryRow> for Enquiry {
    fn from(row: EnquiryRow) -> Self {
        Enquiry {
            id: row.id,
            enquiry_number: row.enquiry_number,
            case_id: row.case_id,
            customer_name: row.customer_name,
            contact_email: row.contact_email,
            subject: row.subject,
            details: row.details,
            created_by: row.created_by,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ENQUIRY_COLUMNS: &str = "id, enquiry_number, case_id, customer_name, contact_email, \
                               subject, details, created_by, archived, created_at, updated_at";

/// Input for creating an enquiry
#[derive(Debug, Deserialize)]
pub struct CreateEnquiryInput {
    pub customer_name: String,
    pub contact_email: Option<String>,
    pub subject: String,
    pub details: Option<String>,
}

/// Input for updating an enquiry
#[derive(Debug, Deserialize)]
pub struct UpdateEnquiryInput {
    pub contact_email: Option<String>,
    pub subject: Option<String>,
    pub details: Option<String>,
}

impl EnquiryService {
    /// Create a new EnquiryService instance
    pub fn new(db: PgPool, sequences: SequenceService) -> Self {
        let history = HistoryService::new(db.clone());
        Self {
            db,
            sequences,
            history,
        }
    }

    /// Register an enquiry, creating its case in the estimation stage
    pub async fn create_enquiry(
        &self,
        input: CreateEnquiryInput,
        actor_id: Uuid,
    ) -> AppResult<Enquiry> {
        if input.customer_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "customer_name".to_string(),
                message: "Customer name cannot be empty".to_string(),
            });
        }
        if input.subject.trim().is_empty() {
            return Err(AppError::Validation {
                field: "subject".to_string(),
                message: "Subject cannot be empty".to_string(),
            });
        }
        if let Some(ref email) = input.contact_email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "contact_email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let case_number = self
            .sequences
            .next_document_number_in(&mut tx, DocumentType::Case)
            .await?;

        let case_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO cases (case_number, current_state, customer_name)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&case_number)
        .bind(CaseState::Estimation.as_str())
        .bind(&input.customer_name)
        .fetch_one(&mut *tx)
        .await?;

        let enquiry_number = self
            .sequences
            .next_document_number_in(&mut tx, DocumentType::Enquiry)
            .await?;

        let row = sqlx::query_as::<_, EnquiryRow>(&format!(
            r#"
            INSERT INTO enquiries (enquiry_number, case_id, customer_name, contact_email, subject, details, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ENQUIRY_COLUMNS
        ))
        .bind(&enquiry_number)
        .bind(case_id)
        .bind(&input.customer_name)
        .bind(&input.contact_email)
        .bind(&input.subject)
        .bind(&input.details)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        self.history
            .record_in(
                &mut tx,
                DocumentType::Enquiry,
                row.id,
                "created",
                Some(&format!("case {} opened", case_number)),
                actor_id,
            )
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Get an enquiry by ID
    pub async fn get_enquiry(&self, enquiry_id: Uuid) -> AppResult<Enquiry> {
        let row = sqlx::query_as::<_, EnquiryRow>(&format!(
            "SELECT {} FROM enquiries WHERE id = $1",
            ENQUIRY_COLUMNS
        ))
        .bind(enquiry_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enquiry".to_string()))?;

        Ok(row.into())
    }

    /// List all non-archived enquiries, newest first
    pub async fn list_enquiries(&self) -> AppResult<Vec<Enquiry>> {
        let rows = sqlx::query_as::<_, EnquiryRow>(&format!(
            "SELECT {} FROM enquiries WHERE archived = FALSE ORDER BY created_at DESC",
            ENQUIRY_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Update an enquiry's editable fields
    pub async fn update_enquiry(
        &self,
        enquiry_id: Uuid,
        input: UpdateEnquiryInput,
    ) -> AppResult<Enquiry> {
        let existing = self.get_enquiry(enquiry_id).await?;

        if let Some(ref email) = input.contact_email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "contact_email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let contact_email = input.contact_email.or(existing.contact_email);
        let subject = input.subject.unwrap_or(existing.subject);
        let details = input.details.or(existing.details);

        let row = sqlx::query_as::<_, EnquiryRow>(&format!(
            r#"
            UPDATE enquiries
            SET contact_email = $1, subject = $2, details = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            ENQUIRY_COLUMNS
        ))
        .bind(&contact_email)
        .bind(&subject)
        .bind(&details)
        .bind(enquiry_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Archive an enquiry (soft delete; ordinary flows never hard-delete)
    pub async fn archive_enquiry(&self, enquiry_id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE enquiries SET archived = TRUE, updated_at = NOW() WHERE id = $1 AND archived = FALSE",
        )
        .bind(enquiry_id)
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound("Enquiry".to_string()));
        }

        self.history
            .record_best_effort(DocumentType::Enquiry, enquiry_id, "archived", None, actor_id)
            .await;

        Ok(())
    }
}
