//! Estimation management service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{HistoryService, SequenceService};
use shared::{
    document_total, validate_line_item, DocumentStatus, DocumentType, Estimation, EstimationItem,
};

/// Estimation service
#[derive(Clone)]
pub struct EstimationService {
    db: PgPool,
    sequences: SequenceService,
    history: HistoryService,
}

#[derive(Debug, sqlx::FromRow)]
struct EstimationRow {
    id: Uuid,
    estimation_number: String,
    enquiry_id: Uuid,
    case_id: Uuid,
    status: String,
    total_cost: Decimal,
    notes: Option<String>,
    created_by: Uuid,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EstimationRow> for Estimation {
    type Error = AppError;

    fn try_from(row: EstimationRow) -> Result<Self, Self::Error> {
        let status = DocumentStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unknown estimation status '{}' in store", row.status))
        })?;
        Ok(Estimation {
            id: row.id,
            estimation_number: row.estimation_number,
            enquiry_id: row.enquiry_id,
            case_id: row.case_id,
            status,
            total_cost: row.total_cost,
            notes: row.notes,
            created_by: row.created_by,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const ESTIMATION_COLUMNS: &str = "id, estimation_number, enquiry_id, case_id, status, total_cost, \
                                  notes, created_by, approved_by, approved_at, archived, \
                                  created_at, updated_at";

/// Input for one costed line
#[derive(Debug, Deserialize)]
pub struct EstimationItemInput {
    pub description: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

/// Input for creating an estimation
#[derive(Debug, Deserialize)]
pub struct CreateEstimationInput {
    pub enquiry_id: Uuid,
    pub items: Vec<EstimationItemInput>,
    pub notes: Option<String>,
}

/// Estimation with its line items
#[derive(Debug, Clone, Serialize)]
pub struct EstimationWithItems {
    #[serde(flatten)]
    pub estimation: Estimation,
    pub items: Vec<EstimationItem>,
}

impl EstimationService {
    /// Create a new EstimationService instance
    pub fn new(db: PgPool, sequences: SequenceService) -> Self {
        let history = HistoryService::new(db.clone());
        Self {
            db,
            sequences,
            history,
        }
    }

    /// Create a draft estimation under an enquiry
    pub async fn create_estimation(
        &self,
        input: CreateEstimationInput,
        actor_id: Uuid,
    ) -> AppResult<EstimationWithItems> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one line item is required".to_string(),
            });
        }
        for item in &input.items {
            validate_line_item(&item.description, item.quantity, item.unit_cost).map_err(
                |msg| AppError::Validation {
                    field: "items".to_string(),
                    message: msg.to_string(),
                },
            )?;
        }

        // Resolve the owning case from the enquiry
        let case_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT case_id FROM enquiries WHERE id = $1 AND archived = FALSE",
        )
        .bind(input.enquiry_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Enquiry".to_string()))?;

        let lines: Vec<(Decimal, Decimal)> = input
            .items
            .iter()
            .map(|i| (i.quantity, i.unit_cost))
            .collect();
        let total_cost = document_total(&lines);

        let mut tx = self.db.begin().await?;

        let estimation_number = self
            .sequences
            .next_document_number_in(&mut tx, DocumentType::Estimation)
            .await?;

        let row = sqlx::query_as::<_, EstimationRow>(&format!(
            r#"
            INSERT INTO estimations (estimation_number, enquiry_id, case_id, status, total_cost, notes, created_by)
            VALUES ($1, $2, $3, 'draft', $4, $5, $6)
            RETURNING {}
            "#,
            ESTIMATION_COLUMNS
        ))
        .bind(&estimation_number)
        .bind(input.enquiry_id)
        .bind(case_id)
        .bind(total_cost)
        .bind(&input.notes)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO estimation_items (estimation_id, description, quantity, unit_cost)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(row.id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_cost)
            .execute(&mut *tx)
            .await?;
        }

        self.history
            .record_in(&mut tx, DocumentType::Estimation, row.id, "created", None, actor_id)
            .await?;

        tx.commit().await?;

        let estimation: Estimation = row.try_into()?;
        let items = self.get_items(estimation.id).await?;

        Ok(EstimationWithItems { estimation, items })
    }

    /// Submit a draft estimation for approval
    pub async fn submit_estimation(
        &self,
        estimation_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<Estimation> {
        let row = sqlx::query_as::<_, EstimationRow>(&format!(
            r#"
            UPDATE estimations
            SET status = 'pending_approval', updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING {}
            "#,
            ESTIMATION_COLUMNS
        ))
        .bind(estimation_id)
        .fetch_optional(&self.db)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                let status = sqlx::query_scalar::<_, String>(
                    "SELECT status FROM estimations WHERE id = $1",
                )
                .bind(estimation_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Estimation".to_string()))?;

                return Err(AppError::Conflict {
                    resource: "estimation".to_string(),
                    message: format!(
                        "estimation in status '{}' cannot be submitted, expected 'draft'",
                        status
                    ),
                });
            }
        };

        self.history
            .record_best_effort(
                DocumentType::Estimation,
                estimation_id,
                DocumentStatus::PendingApproval.as_str(),
                None,
                actor_id,
            )
            .await;

        row.try_into()
    }

    /// Get an estimation with its line items
    pub async fn get_estimation(&self, estimation_id: Uuid) -> AppResult<EstimationWithItems> {
        let row = sqlx::query_as::<_, EstimationRow>(&format!(
            "SELECT {} FROM estimations WHERE id = $1",
            ESTIMATION_COLUMNS
        ))
        .bind(estimation_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Estimation".to_string()))?;

        let estimation: Estimation = row.try_into()?;
        let items = self.get_items(estimation_id).await?;

        Ok(EstimationWithItems { estimation, items })
    }

    /// List all non-archived estimations, newest first
    pub async fn list_estimations(&self) -> AppResult<Vec<Estimation>> {
        let rows = sqlx::query_as::<_, EstimationRow>(&format!(
            "SELECT {} FROM estimations WHERE archived = FALSE ORDER BY created_at DESC",
            ESTIMATION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_items(&self, estimation_id: Uuid) -> AppResult<Vec<EstimationItem>> {
        let items = sqlx::query_as::<_, (Uuid, Uuid, String, Decimal, Decimal)>(
            r#"
            SELECT id, estimation_id, description, quantity, unit_cost
            FROM estimation_items
            WHERE estimation_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(estimation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items
            .into_iter()
            .map(|(id, estimation_id, description, quantity, unit_cost)| EstimationItem {
                id,
                estimation_id,
                description,
                quantity,
                unit_cost,
            })
            .collect())
    }
}
