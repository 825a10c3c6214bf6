//! Quotation management service
//!
//! Creation and submission live here; approval and rejection go through the
//! workflow orchestrator because they fan out case and sales-order writes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{HistoryService, SequenceService};
use shared::{
    document_total, validate_line_item, DocumentStatus, DocumentType, Quotation, QuotationItem,
};

/// Quotation service
#[derive(Clone)]
pub struct QuotationService {
    db: PgPool,
    sequences: SequenceService,
    history: HistoryService,
}

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: Uuid,
    quotation_number: String,
    case_id: Option<Uuid>,
    estimation_id: Option<Uuid>,
    customer_name: String,
    status: String,
    total_amount: Decimal,
    valid_until: Option<NaiveDate>,
    created_by: Uuid,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuotationRow> for Quotation {
    type Error = AppError;

    fn try_from(row: QuotationRow) -> Result<Self, Self::Error> {
        let status = DocumentStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unknown quotation status '{}' in store", row.status))
        })?;
        Ok(Quotation {
            id: row.id,
            quotation_number: row.quotation_number,
            case_id: row.case_id,
            estimation_id: row.estimation_id,
            customer_name: row.customer_name,
            status,
            total_amount: row.total_amount,
            valid_until: row.valid_until,
            created_by: row.created_by,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const QUOTATION_COLUMNS: &str = "id, quotation_number, case_id, estimation_id, customer_name, \
                                 status, total_amount, valid_until, created_by, approved_by, \
                                 approved_at, archived, created_at, updated_at";

/// Input for one priced line
#[derive(Debug, Deserialize)]
pub struct QuotationItemInput {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Input for creating a standalone quotation
#[derive(Debug, Deserialize)]
pub struct CreateQuotationInput {
    pub customer_name: String,
    pub case_id: Option<Uuid>,
    pub items: Vec<QuotationItemInput>,
    pub valid_until: Option<NaiveDate>,
}

/// Quotation with its line items
#[derive(Debug, Clone, Serialize)]
pub struct QuotationWithItems {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub items: Vec<QuotationItem>,
}

impl QuotationService {
    /// Create a new QuotationService instance
    pub fn new(db: PgPool, sequences: SequenceService) -> Self {
        let history = HistoryService::new(db.clone());
        Self {
            db,
            sequences,
            history,
        }
    }

    /// Create a draft quotation. The total is derived from the line items.
    pub async fn create_quotation(
        &self,
        input: CreateQuotationInput,
        actor_id: Uuid,
    ) -> AppResult<QuotationWithItems> {
        if input.customer_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "customer_name".to_string(),
                message: "Customer name cannot be empty".to_string(),
            });
        }
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one line item is required".to_string(),
            });
        }
        for item in &input.items {
            validate_line_item(&item.description, item.quantity, item.unit_price).map_err(
                |msg| AppError::Validation {
                    field: "items".to_string(),
                    message: msg.to_string(),
                },
            )?;
        }

        // A linked case must exist before the quotation references it
        if let Some(case_id) = input.case_id {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cases WHERE id = $1")
                .bind(case_id)
                .fetch_one(&self.db)
                .await?;
            if exists == 0 {
                return Err(AppError::NotFound("Case".to_string()));
            }
        }

        let lines: Vec<(Decimal, Decimal)> = input
            .items
            .iter()
            .map(|i| (i.quantity, i.unit_price))
            .collect();
        let total_amount = document_total(&lines);

        let mut tx = self.db.begin().await?;

        let quotation_number = self
            .sequences
            .next_document_number_in(&mut tx, DocumentType::Quotation)
            .await?;

        let row = sqlx::query_as::<_, QuotationRow>(&format!(
            r#"
            INSERT INTO quotations (quotation_number, case_id, customer_name, status, total_amount, valid_until, created_by)
            VALUES ($1, $2, $3, 'draft', $4, $5, $6)
            RETURNING {}
            "#,
            QUOTATION_COLUMNS
        ))
        .bind(&quotation_number)
        .bind(input.case_id)
        .bind(&input.customer_name)
        .bind(total_amount)
        .bind(input.valid_until)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO quotation_items (quotation_id, description, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(row.id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        self.history
            .record_in(&mut tx, DocumentType::Quotation, row.id, "created", None, actor_id)
            .await?;

        tx.commit().await?;

        let quotation: Quotation = row.try_into()?;
        let items = self.get_items(quotation.id).await?;

        Ok(QuotationWithItems { quotation, items })
    }

    /// Submit a draft quotation for approval
    pub async fn submit_quotation(
        &self,
        quotation_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<Quotation> {
        let row = sqlx::query_as::<_, QuotationRow>(&format!(
            r#"
            UPDATE quotations
            SET status = 'pending_approval', updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING {}
            "#,
            QUOTATION_COLUMNS
        ))
        .bind(quotation_id)
        .fetch_optional(&self.db)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                let status = sqlx::query_scalar::<_, String>(
                    "SELECT status FROM quotations WHERE id = $1",
                )
                .bind(quotation_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Quotation".to_string()))?;

                return Err(AppError::Conflict {
                    resource: "quotation".to_string(),
                    message: format!(
                        "quotation in status '{}' cannot be submitted, expected 'draft'",
                        status
                    ),
                });
            }
        };

        self.history
            .record_best_effort(
                DocumentType::Quotation,
                quotation_id,
                DocumentStatus::PendingApproval.as_str(),
                None,
                actor_id,
            )
            .await;

        row.try_into()
    }

    /// Get a quotation with its line items
    pub async fn get_quotation(&self, quotation_id: Uuid) -> AppResult<QuotationWithItems> {
        let row = sqlx::query_as::<_, QuotationRow>(&format!(
            "SELECT {} FROM quotations WHERE id = $1",
            QUOTATION_COLUMNS
        ))
        .bind(quotation_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Quotation".to_string()))?;

        let quotation: Quotation = row.try_into()?;
        let items = self.get_items(quotation_id).await?;

        Ok(QuotationWithItems { quotation, items })
    }

    /// List all non-archived quotations, newest first
    pub async fn list_quotations(&self) -> AppResult<Vec<Quotation>> {
        let rows = sqlx::query_as::<_, QuotationRow>(&format!(
            "SELECT {} FROM quotations WHERE archived = FALSE ORDER BY created_at DESC",
            QUOTATION_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_items(&self, quotation_id: Uuid) -> AppResult<Vec<QuotationItem>> {
        let items = sqlx::query_as::<_, (Uuid, Uuid, String, Decimal, Decimal)>(
            r#"
            SELECT id, quotation_id, description, quantity, unit_price
            FROM quotation_items
            WHERE quotation_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(quotation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items
            .into_iter()
            .map(|(id, quotation_id, description, quantity, unit_price)| QuotationItem {
                id,
                quotation_id,
                description,
                quantity,
                unit_price,
            })
            .collect())
    }
}
