//! Purchase requisition management service
//!
//! Requisitions follow the same draft/pending/approved flow as the sales
//! documents, but their approval has no child document; it only changes
//! status and leaves an audit entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{HistoryService, SequenceService};
use shared::{DocumentStatus, DocumentType, PurchaseRequisition};

/// Purchase requisition service
#[derive(Clone)]
pub struct PurchaseRequisitionService {
    db: PgPool,
    sequences: SequenceService,
    history: HistoryService,
}

#[derive(Debug, sqlx::FromRow)]
struct RequisitionRow {
    id: Uuid,
    requisition_number: String,
    work_order_id: Option<Uuid>,
    purpose: String,
    status: String,
    total_estimated_cost: Decimal,
    created_by: Uuid,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RequisitionRow> for PurchaseRequisition {
    type Error = AppError;

    fn try_from(row: RequisitionRow) -> Result<Self, Self::Error> {
        let status = DocumentStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!(
                "unknown purchase requisition status '{}' in store",
                row.status
            ))
        })?;
        Ok(PurchaseRequisition {
            id: row.id,
            requisition_number: row.requisition_number,
            work_order_id: row.work_order_id,
            purpose: row.purpose,
            status,
            total_estimated_cost: row.total_estimated_cost,
            created_by: row.created_by,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const REQUISITION_COLUMNS: &str = "id, requisition_number, work_order_id, purpose, status, \
                                   total_estimated_cost, created_by, approved_by, approved_at, \
                                   archived, created_at, updated_at";

/// Input for creating a purchase requisition
#[derive(Debug, Deserialize)]
pub struct CreateRequisitionInput {
    pub work_order_id: Option<Uuid>,
    pub purpose: String,
    pub total_estimated_cost: Decimal,
}

impl PurchaseRequisitionService {
    /// Create a new PurchaseRequisitionService instance
    pub fn new(db: PgPool, sequences: SequenceService) -> Self {
        let history = HistoryService::new(db.clone());
        Self {
            db,
            sequences,
            history,
        }
    }

    /// Create a draft purchase requisition
    pub async fn create_requisition(
        &self,
        input: CreateRequisitionInput,
        actor_id: Uuid,
    ) -> AppResult<PurchaseRequisition> {
        if input.purpose.trim().is_empty() {
            return Err(AppError::Validation {
                field: "purpose".to_string(),
                message: "Purpose cannot be empty".to_string(),
            });
        }
        if input.total_estimated_cost < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "total_estimated_cost".to_string(),
                message: "Estimated cost cannot be negative".to_string(),
            });
        }

        if let Some(work_order_id) = input.work_order_id {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM work_orders WHERE id = $1")
                    .bind(work_order_id)
                    .fetch_one(&self.db)
                    .await?;
            if exists == 0 {
                return Err(AppError::NotFound("Work order".to_string()));
            }
        }

        let mut tx = self.db.begin().await?;

        let requisition_number = self
            .sequences
            .next_document_number_in(&mut tx, DocumentType::PurchaseRequisition)
            .await?;

        let row = sqlx::query_as::<_, RequisitionRow>(&format!(
            r#"
            INSERT INTO purchase_requisitions
                (requisition_number, work_order_id, purpose, status, total_estimated_cost, created_by)
            VALUES ($1, $2, $3, 'draft', $4, $5)
            RETURNING {}
            "#,
            REQUISITION_COLUMNS
        ))
        .bind(&requisition_number)
        .bind(input.work_order_id)
        .bind(&input.purpose)
        .bind(input.total_estimated_cost)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        self.history
            .record_in(
                &mut tx,
                DocumentType::PurchaseRequisition,
                row.id,
                "created",
                None,
                actor_id,
            )
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Submit a draft requisition for approval
    pub async fn submit_requisition(
        &self,
        requisition_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<PurchaseRequisition> {
        let row = sqlx::query_as::<_, RequisitionRow>(&format!(
            r#"
            UPDATE purchase_requisitions
            SET status = 'pending_approval', updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING {}
            "#,
            REQUISITION_COLUMNS
        ))
        .bind(requisition_id)
        .fetch_optional(&self.db)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                let status = sqlx::query_scalar::<_, String>(
                    "SELECT status FROM purchase_requisitions WHERE id = $1",
                )
                .bind(requisition_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Purchase requisition".to_string()))?;

                return Err(AppError::Conflict {
                    resource: "purchase_requisition".to_string(),
                    message: format!(
                        "purchase requisition in status '{}' cannot be submitted, expected 'draft'",
                        status
                    ),
                });
            }
        };

        self.history
            .record_best_effort(
                DocumentType::PurchaseRequisition,
                requisition_id,
                DocumentStatus::PendingApproval.as_str(),
                None,
                actor_id,
            )
            .await;

        row.try_into()
    }

    /// Approve a pending requisition. Re-approval is a Conflict.
    pub async fn approve_requisition(
        &self,
        requisition_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<PurchaseRequisition> {
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, RequisitionRow>(&format!(
            r#"
            UPDATE purchase_requisitions
            SET status = 'approved', approved_by = $2, approved_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status IN ('draft', 'pending_approval')
            RETURNING {}
            "#,
            REQUISITION_COLUMNS
        ))
        .bind(requisition_id)
        .bind(actor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                let status = sqlx::query_scalar::<_, String>(
                    "SELECT status FROM purchase_requisitions WHERE id = $1",
                )
                .bind(requisition_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Purchase requisition".to_string()))?;

                let message = if status == DocumentStatus::Approved.as_str() {
                    "purchase requisition is already approved".to_string()
                } else {
                    format!(
                        "purchase requisition in status '{}' cannot be approved",
                        status
                    )
                };
                return Err(AppError::Conflict {
                    resource: "purchase_requisition".to_string(),
                    message,
                });
            }
        };

        self.history
            .record_in(
                &mut tx,
                DocumentType::PurchaseRequisition,
                requisition_id,
                DocumentStatus::Approved.as_str(),
                None,
                actor_id,
            )
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    /// Get a requisition by ID
    pub async fn get_requisition(&self, requisition_id: Uuid) -> AppResult<PurchaseRequisition> {
        let row = sqlx::query_as::<_, RequisitionRow>(&format!(
            "SELECT {} FROM purchase_requisitions WHERE id = $1",
            REQUISITION_COLUMNS
        ))
        .bind(requisition_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase requisition".to_string()))?;

        row.try_into()
    }

    /// List all non-archived requisitions, newest first
    pub async fn list_requisitions(&self) -> AppResult<Vec<PurchaseRequisition>> {
        let rows = sqlx::query_as::<_, RequisitionRow>(&format!(
            "SELECT {} FROM purchase_requisitions WHERE archived = FALSE ORDER BY created_at DESC",
            REQUISITION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

}
