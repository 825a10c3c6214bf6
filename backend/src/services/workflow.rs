//! Case lifecycle orchestrator
//!
//! Owns the case state machine and the side-effect fan-out of document
//! approvals. Every transition runs as one database transaction: the
//! triggering document's status update, the case advance (guarded by an
//! expected-prior-state check), the mandated child document, the
//! state-transition row and the audit entry all commit together or not at
//! all. Entities only hold forward references to their case; this service
//! is the single place allowed to create child documents as a consequence
//! of a parent's state change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{HistoryService, SequenceService};
use shared::{
    document_total, transition_to, Case, CaseState, CaseStateTransitionRecord, CaseTransition,
    DocumentStatus, DocumentType, TransitionSideEffect, WorkOrderStatus,
};

/// Workflow service driving case transitions and approvals
#[derive(Clone)]
pub struct WorkflowService {
    db: PgPool,
    sequences: SequenceService,
    history: HistoryService,
}

/// A document created as a transition side effect
#[derive(Debug, Clone, Serialize)]
pub struct ChildDocument {
    pub document_type: DocumentType,
    pub id: Uuid,
    pub document_number: String,
}

/// Result of a committed case transition
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub case_id: Uuid,
    pub from_state: CaseState,
    pub new_state: CaseState,
    pub child_documents: Vec<ChildDocument>,
}

/// Result of a committed document approval or rejection
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    pub document_type: DocumentType,
    pub document_id: Uuid,
    pub status: DocumentStatus,
    pub case_transition: Option<TransitionOutcome>,
}

#[derive(Debug, sqlx::FromRow)]
struct CaseRow {
    id: Uuid,
    case_number: String,
    current_state: String,
    customer_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CaseRow> for Case {
    type Error = AppError;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        let current_state = CaseState::from_str(&row.current_state).ok_or_else(|| {
            AppError::Internal(format!("unknown case state '{}' in store", row.current_state))
        })?;
        Ok(Case {
            id: row.id,
            case_number: row.case_number,
            current_state,
            customer_name: row.customer_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl WorkflowService {
    /// Create a new WorkflowService instance
    pub fn new(db: PgPool, sequences: SequenceService) -> Self {
        let history = HistoryService::new(db.clone());
        Self {
            db,
            sequences,
            history,
        }
    }

    // ------------------------------------------------------------------
    // Case reads
    // ------------------------------------------------------------------

    /// Get a case by ID
    pub async fn get_case(&self, case_id: Uuid) -> AppResult<Case> {
        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT id, case_number, current_state, customer_name, created_at, updated_at
            FROM cases
            WHERE id = $1
            "#,
        )
        .bind(case_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Case".to_string()))?;

        row.try_into()
    }

    /// List all cases, newest first
    pub async fn list_cases(&self) -> AppResult<Vec<Case>> {
        let rows = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT id, case_number, current_state, customer_name, created_at, updated_at
            FROM cases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Chronological state-transition log of a case
    pub async fn case_transitions(
        &self,
        case_id: Uuid,
    ) -> AppResult<Vec<CaseStateTransitionRecord>> {
        // Confirm the case exists so an empty log is distinguishable
        self.get_case(case_id).await?;

        let rows = sqlx::query_as::<_, (Uuid, Uuid, String, String, String, Uuid, Uuid, Option<String>, DateTime<Utc>)>(
            r#"
            SELECT id, case_id, from_state, to_state, trigger_entity_type,
                   trigger_entity_id, actor_id, notes, created_at
            FROM case_state_transitions
            WHERE case_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(case_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|r| {
                let from_state = CaseState::from_str(&r.2)
                    .ok_or_else(|| AppError::Internal(format!("unknown case state '{}'", r.2)))?;
                let to_state = CaseState::from_str(&r.3)
                    .ok_or_else(|| AppError::Internal(format!("unknown case state '{}'", r.3)))?;
                Ok(CaseStateTransitionRecord {
                    id: r.0,
                    case_id: r.1,
                    from_state,
                    to_state,
                    trigger_entity_type: r.4,
                    trigger_entity_id: r.5,
                    actor_id: r.6,
                    notes: r.7,
                    created_at: r.8,
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Generic transition entry point
    // ------------------------------------------------------------------

    /// Move a case into `target_state`, running the transition's side
    /// effects atomically.
    ///
    /// The trigger entity must be the document type the transition table
    /// declares for the target state, must belong to this case, and must
    /// still be approvable; it is approved as part of the transition. A
    /// concurrent transition that already advanced the case makes this call
    /// fail with a Conflict rather than overwrite the winner.
    pub async fn transition_case(
        &self,
        case_id: Uuid,
        trigger_entity_type: DocumentType,
        trigger_entity_id: Uuid,
        target_state: CaseState,
        actor_id: Uuid,
    ) -> AppResult<TransitionOutcome> {
        let transition = transition_to(target_state).ok_or_else(|| {
            AppError::InvalidStateTransition(format!(
                "no transition leads into state '{}'",
                target_state
            ))
        })?;

        if trigger_entity_type != transition.trigger {
            return Err(AppError::ValidationError(format!(
                "transition to '{}' must be triggered by a {}, got {}",
                target_state,
                transition.trigger.as_str(),
                trigger_entity_type.as_str()
            )));
        }

        let (table, resource) = trigger_table(transition.trigger).ok_or_else(|| {
            AppError::Internal(format!(
                "no trigger table for document type '{}'",
                transition.trigger.as_str()
            ))
        })?;

        let mut tx = self.db.begin().await?;

        // The trigger document is approved first, guarded on both its
        // status and its membership of this case. Zero affected rows means
        // the whole transition must not happen.
        let updated = sqlx::query(&format!(
            r#"
            UPDATE {}
            SET status = 'approved', approved_by = $2, approved_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status IN ('draft', 'pending_approval') AND case_id = $3
            "#,
            table
        ))
        .bind(trigger_entity_id)
        .bind(actor_id)
        .bind(case_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(self
                .trigger_conflict(&mut tx, table, resource, trigger_entity_id, case_id)
                .await?);
        }

        let outcome = self
            .advance_case_in(
                &mut tx,
                case_id,
                transition,
                trigger_entity_id,
                actor_id,
                None,
            )
            .await?;

        self.history
            .record_in(
                &mut tx,
                trigger_entity_type,
                trigger_entity_id,
                DocumentStatus::Approved.as_str(),
                Some(&format!(
                    "case moved from {} to {}",
                    outcome.from_state, outcome.new_state
                )),
                actor_id,
            )
            .await?;

        tx.commit().await?;

        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Document approvals
    // ------------------------------------------------------------------

    /// Approve an estimation: estimation -> approved, case estimation ->
    /// quotation, and a draft quotation is created from the estimation's
    /// line items.
    pub async fn approve_estimation(
        &self,
        estimation_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ApprovalOutcome> {
        let mut tx = self.db.begin().await?;

        let case_id: Uuid = {
            let row = sqlx::query_as::<_, (Uuid,)>(
                r#"
                UPDATE estimations
                SET status = 'approved', approved_by = $2, approved_at = NOW(), updated_at = NOW()
                WHERE id = $1 AND status IN ('draft', 'pending_approval')
                RETURNING case_id
                "#,
            )
            .bind(estimation_id)
            .bind(actor_id)
            .fetch_optional(&mut *tx)
            .await?;

            match row {
                Some((case_id,)) => case_id,
                None => {
                    return Err(self
                        .approval_conflict(&mut tx, "estimations", "Estimation", estimation_id)
                        .await?)
                }
            }
        };

        let transition = transition_to(CaseState::Quotation)
            .ok_or_else(|| AppError::Internal("transition table missing quotation stage".into()))?;
        let outcome = self
            .advance_case_in(&mut tx, case_id, transition, estimation_id, actor_id, None)
            .await?;

        self.history
            .record_in(
                &mut tx,
                DocumentType::Estimation,
                estimation_id,
                DocumentStatus::Approved.as_str(),
                child_note(&outcome.child_documents).as_deref(),
                actor_id,
            )
            .await?;

        tx.commit().await?;

        Ok(ApprovalOutcome {
            document_type: DocumentType::Estimation,
            document_id: estimation_id,
            status: DocumentStatus::Approved,
            case_transition: Some(outcome),
        })
    }

    /// Approve a quotation: quotation -> approved, the linked case moves
    /// quotation -> order, and a sales order is instantiated from the
    /// quotation's line items with the total recomputed from those items.
    pub async fn approve_quotation(
        &self,
        quotation_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ApprovalOutcome> {
        let mut tx = self.db.begin().await?;

        let case_id: Option<Uuid> = {
            let row = sqlx::query_as::<_, (Option<Uuid>,)>(
                r#"
                UPDATE quotations
                SET status = 'approved', approved_by = $2, approved_at = NOW(), updated_at = NOW()
                WHERE id = $1 AND status IN ('draft', 'pending_approval')
                RETURNING case_id
                "#,
            )
            .bind(quotation_id)
            .bind(actor_id)
            .fetch_optional(&mut *tx)
            .await?;

            match row {
                Some((case_id,)) => case_id,
                None => {
                    return Err(self
                        .approval_conflict(&mut tx, "quotations", "Quotation", quotation_id)
                        .await?)
                }
            }
        };

        // Without a linked case the approval still creates the sales order
        let (case_transition, child) = match case_id {
            Some(case_id) => {
                let transition = transition_to(CaseState::Order).ok_or_else(|| {
                    AppError::Internal("transition table missing order stage".into())
                })?;
                let outcome = self
                    .advance_case_in(&mut tx, case_id, transition, quotation_id, actor_id, None)
                    .await?;
                let child = outcome.child_documents.first().cloned();
                (Some(outcome), child)
            }
            None => {
                let child = self
                    .create_sales_order_in(&mut tx, quotation_id, actor_id)
                    .await?;
                (None, Some(child))
            }
        };

        self.history
            .record_in(
                &mut tx,
                DocumentType::Quotation,
                quotation_id,
                DocumentStatus::Approved.as_str(),
                child
                    .as_ref()
                    .map(|c| format!("sales order {} created", c.document_number))
                    .as_deref(),
                actor_id,
            )
            .await?;

        tx.commit().await?;

        Ok(ApprovalOutcome {
            document_type: DocumentType::Quotation,
            document_id: quotation_id,
            status: DocumentStatus::Approved,
            case_transition,
        })
    }

    /// Reject a quotation awaiting approval, returning it to draft.
    /// The case state is untouched; rejection is a document-level edge.
    pub async fn reject_quotation(
        &self,
        quotation_id: Uuid,
        actor_id: Uuid,
        reason: Option<&str>,
    ) -> AppResult<ApprovalOutcome> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE quotations
            SET status = 'draft', updated_at = NOW()
            WHERE id = $1 AND status = 'pending_approval'
            "#,
        )
        .bind(quotation_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let status = sqlx::query_scalar::<_, String>(
                "SELECT status FROM quotations WHERE id = $1",
            )
            .bind(quotation_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Quotation".to_string()))?;

            return Err(AppError::Conflict {
                resource: "quotation".to_string(),
                message: format!(
                    "quotation in status '{}' cannot be rejected, expected 'pending_approval'",
                    status
                ),
            });
        }

        self.history
            .record_in(
                &mut tx,
                DocumentType::Quotation,
                quotation_id,
                DocumentStatus::Rejected.as_str(),
                reason,
                actor_id,
            )
            .await?;

        tx.commit().await?;

        Ok(ApprovalOutcome {
            document_type: DocumentType::Quotation,
            document_id: quotation_id,
            status: DocumentStatus::Draft,
            case_transition: None,
        })
    }

    /// Approve a sales order: order -> approved, the linked case moves
    /// order -> production, and a work order is created.
    pub async fn approve_sales_order(
        &self,
        sales_order_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ApprovalOutcome> {
        let mut tx = self.db.begin().await?;

        let case_id: Option<Uuid> = {
            let row = sqlx::query_as::<_, (Option<Uuid>,)>(
                r#"
                UPDATE sales_orders
                SET status = 'approved', approved_by = $2, approved_at = NOW(), updated_at = NOW()
                WHERE id = $1 AND status IN ('draft', 'pending_approval')
                RETURNING case_id
                "#,
            )
            .bind(sales_order_id)
            .bind(actor_id)
            .fetch_optional(&mut *tx)
            .await?;

            match row {
                Some((case_id,)) => case_id,
                None => {
                    return Err(self
                        .approval_conflict(&mut tx, "sales_orders", "Sales order", sales_order_id)
                        .await?)
                }
            }
        };

        let (case_transition, child) = match case_id {
            Some(case_id) => {
                let transition = transition_to(CaseState::Production).ok_or_else(|| {
                    AppError::Internal("transition table missing production stage".into())
                })?;
                let outcome = self
                    .advance_case_in(&mut tx, case_id, transition, sales_order_id, actor_id, None)
                    .await?;
                let child = outcome.child_documents.first().cloned();
                (Some(outcome), child)
            }
            None => {
                let child = self
                    .create_work_order_in(&mut tx, sales_order_id, actor_id)
                    .await?;
                (None, Some(child))
            }
        };

        self.history
            .record_in(
                &mut tx,
                DocumentType::SalesOrder,
                sales_order_id,
                DocumentStatus::Approved.as_str(),
                child
                    .as_ref()
                    .map(|c| format!("work order {} created", c.document_number))
                    .as_deref(),
                actor_id,
            )
            .await?;

        tx.commit().await?;

        Ok(ApprovalOutcome {
            document_type: DocumentType::SalesOrder,
            document_id: sales_order_id,
            status: DocumentStatus::Approved,
            case_transition,
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Advance the case with an expected-prior-state guard, log the
    /// transition row and run the side effect, all on the caller's
    /// transaction.
    async fn advance_case_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        case_id: Uuid,
        transition: &CaseTransition,
        trigger_entity_id: Uuid,
        actor_id: Uuid,
        notes: Option<&str>,
    ) -> AppResult<TransitionOutcome> {
        // The guarded update is the concurrency control: of two racing
        // transitions, the second sees zero affected rows and fails.
        let updated = sqlx::query(
            r#"
            UPDATE cases
            SET current_state = $1, updated_at = NOW()
            WHERE id = $2 AND current_state = $3
            "#,
        )
        .bind(transition.to.as_str())
        .bind(case_id)
        .bind(transition.from.as_str())
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 0 {
            let state = sqlx::query_scalar::<_, String>(
                "SELECT current_state FROM cases WHERE id = $1",
            )
            .bind(case_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Case".to_string()))?;

            return Err(AppError::Conflict {
                resource: "case".to_string(),
                message: format!(
                    "case is in state '{}', expected '{}' to move to '{}'",
                    state, transition.from, transition.to
                ),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO case_state_transitions
                (case_id, from_state, to_state, trigger_entity_type, trigger_entity_id, actor_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(case_id)
        .bind(transition.from.as_str())
        .bind(transition.to.as_str())
        .bind(transition.trigger.as_str())
        .bind(trigger_entity_id)
        .bind(actor_id)
        .bind(notes)
        .execute(&mut **tx)
        .await?;

        let mut child_documents = Vec::new();
        if let Some(effect) = transition.side_effect {
            let child = self
                .run_side_effect(tx, effect, trigger_entity_id, actor_id)
                .await?;
            child_documents.push(child);
        }

        tracing::info!(
            "Case {} advanced {} -> {} (trigger {} {})",
            case_id,
            transition.from,
            transition.to,
            transition.trigger.as_str(),
            trigger_entity_id
        );

        Ok(TransitionOutcome {
            case_id,
            from_state: transition.from,
            new_state: transition.to,
            child_documents,
        })
    }

    async fn run_side_effect(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        effect: TransitionSideEffect,
        trigger_entity_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ChildDocument> {
        match effect {
            TransitionSideEffect::CreateQuotation => {
                self.create_quotation_in(tx, trigger_entity_id, actor_id).await
            }
            TransitionSideEffect::CreateSalesOrder => {
                self.create_sales_order_in(tx, trigger_entity_id, actor_id).await
            }
            TransitionSideEffect::CreateWorkOrder => {
                self.create_work_order_in(tx, trigger_entity_id, actor_id).await
            }
        }
    }

    /// Instantiate a draft quotation from an approved estimation,
    /// carrying the estimation's line items over as priced lines.
    async fn create_quotation_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        estimation_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ChildDocument> {
        let (case_id, customer_name) = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT e.case_id, c.customer_name
            FROM estimations e
            JOIN cases c ON c.id = e.case_id
            WHERE e.id = $1
            "#,
        )
        .bind(estimation_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Estimation".to_string()))?;

        let items = sqlx::query_as::<_, (String, Decimal, Decimal)>(
            "SELECT description, quantity, unit_cost FROM estimation_items WHERE estimation_id = $1",
        )
        .bind(estimation_id)
        .fetch_all(&mut **tx)
        .await?;

        let lines: Vec<(Decimal, Decimal)> = items.iter().map(|i| (i.1, i.2)).collect();
        let total = document_total(&lines);

        let quotation_number = self
            .sequences
            .next_document_number_in(tx, DocumentType::Quotation)
            .await?;

        let quotation_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO quotations
                (quotation_number, case_id, estimation_id, customer_name, status, total_amount, created_by)
            VALUES ($1, $2, $3, $4, 'draft', $5, $6)
            RETURNING id
            "#,
        )
        .bind(&quotation_number)
        .bind(case_id)
        .bind(estimation_id)
        .bind(&customer_name)
        .bind(total)
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;

        for (description, quantity, unit_cost) in &items {
            sqlx::query(
                r#"
                INSERT INTO quotation_items (quotation_id, description, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(quotation_id)
            .bind(description)
            .bind(quantity)
            .bind(unit_cost)
            .execute(&mut **tx)
            .await?;
        }

        Ok(ChildDocument {
            document_type: DocumentType::Quotation,
            id: quotation_id,
            document_number: quotation_number,
        })
    }

    /// Instantiate a sales order from an approved quotation. Line items are
    /// copied and the total is recomputed from them, never taken from the
    /// quotation's cached figure.
    async fn create_sales_order_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        quotation_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ChildDocument> {
        let (case_id, customer_name) = sqlx::query_as::<_, (Option<Uuid>, String)>(
            "SELECT case_id, customer_name FROM quotations WHERE id = $1",
        )
        .bind(quotation_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Quotation".to_string()))?;

        let items = sqlx::query_as::<_, (String, Decimal, Decimal)>(
            "SELECT description, quantity, unit_price FROM quotation_items WHERE quotation_id = $1",
        )
        .bind(quotation_id)
        .fetch_all(&mut **tx)
        .await?;

        let lines: Vec<(Decimal, Decimal)> = items.iter().map(|i| (i.1, i.2)).collect();
        let total = document_total(&lines);

        let order_number = self
            .sequences
            .next_document_number_in(tx, DocumentType::SalesOrder)
            .await?;

        let sales_order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO sales_orders
                (order_number, quotation_id, case_id, customer_name, status, total_amount, created_by)
            VALUES ($1, $2, $3, $4, 'draft', $5, $6)
            RETURNING id
            "#,
        )
        .bind(&order_number)
        .bind(quotation_id)
        .bind(case_id)
        .bind(&customer_name)
        .bind(total)
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;

        for (description, quantity, unit_price) in &items {
            sqlx::query(
                r#"
                INSERT INTO sales_order_items (sales_order_id, description, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(sales_order_id)
            .bind(description)
            .bind(quantity)
            .bind(unit_price)
            .execute(&mut **tx)
            .await?;
        }

        Ok(ChildDocument {
            document_type: DocumentType::SalesOrder,
            id: sales_order_id,
            document_number: order_number,
        })
    }

    /// Create a planned work order for an approved sales order
    async fn create_work_order_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sales_order_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<ChildDocument> {
        let case_id = sqlx::query_scalar::<_, Option<Uuid>>(
            "SELECT case_id FROM sales_orders WHERE id = $1",
        )
        .bind(sales_order_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Sales order".to_string()))?;

        let work_order_number = self
            .sequences
            .next_document_number_in(tx, DocumentType::WorkOrder)
            .await?;

        let work_order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO work_orders (work_order_number, sales_order_id, case_id, status, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&work_order_number)
        .bind(sales_order_id)
        .bind(case_id)
        .bind(WorkOrderStatus::Planned.as_str())
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(ChildDocument {
            document_type: DocumentType::WorkOrder,
            id: work_order_id,
            document_number: work_order_number,
        })
    }

    /// Build the error for a failed guarded approval update: either the
    /// document is gone or its status no longer allows approval. A repeated
    /// approval is a Conflict, never a silent repeat.
    async fn approval_conflict(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        resource: &str,
        document_id: Uuid,
    ) -> AppResult<AppError> {
        let query = format!("SELECT status FROM {} WHERE id = $1", table);
        let status = sqlx::query_scalar::<_, String>(&query)
            .bind(document_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(resource.to_string()))?;

        let message = if status == DocumentStatus::Approved.as_str() {
            format!("{} is already approved", resource)
        } else {
            format!(
                "{} in status '{}' cannot be approved, expected 'draft' or 'pending_approval'",
                resource, status
            )
        };

        Ok(AppError::Conflict {
            resource: resource.to_lowercase().replace(' ', "_"),
            message,
        })
    }

    /// Build the error for a trigger document that could not be approved as
    /// part of a case transition: missing, linked to a different case, or in
    /// a status that no longer allows approval.
    async fn trigger_conflict(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        resource: &str,
        document_id: Uuid,
        case_id: Uuid,
    ) -> AppResult<AppError> {
        let query = format!("SELECT status, case_id FROM {} WHERE id = $1", table);
        let (status, document_case) = sqlx::query_as::<_, (String, Option<Uuid>)>(&query)
            .bind(document_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(resource.to_string()))?;

        let message = if document_case != Some(case_id) {
            format!("{} does not belong to this case", resource)
        } else if status == DocumentStatus::Approved.as_str() {
            format!("{} is already approved", resource)
        } else {
            format!(
                "{} in status '{}' cannot trigger a case transition, expected 'draft' or 'pending_approval'",
                resource, status
            )
        };

        Ok(AppError::Conflict {
            resource: resource.to_lowercase().replace(' ', "_"),
            message,
        })
    }
}

/// Table and display name of the document type that drives a transition
fn trigger_table(trigger: DocumentType) -> Option<(&'static str, &'static str)> {
    match trigger {
        DocumentType::Estimation => Some(("estimations", "Estimation")),
        DocumentType::Quotation => Some(("quotations", "Quotation")),
        DocumentType::SalesOrder => Some(("sales_orders", "Sales order")),
        _ => None,
    }
}

fn child_note(children: &[ChildDocument]) -> Option<String> {
    children
        .first()
        .map(|c| format!("{} {} created", c.document_type.as_str(), c.document_number))
}
