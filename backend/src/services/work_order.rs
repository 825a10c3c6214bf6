//! Work order management service

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::HistoryService;
use shared::{DocumentType, WorkOrder, WorkOrderStatus};

/// Work order service
#[derive(Clone)]
pub struct WorkOrderService {
    db: PgPool,
    history: HistoryService,
}

#[derive(Debug, sqlx::FromRow)]
struct WorkOrderRow {
    id: Uuid,
    work_order_number: String,
    sales_order_id: Uuid,
    case_id: Option<Uuid>,
    status: String,
    scheduled_start: Option<NaiveDate>,
    scheduled_end: Option<NaiveDate>,
    notes: Option<String>,
    created_by: Uuid,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WorkOrderRow> for WorkOrder {
    type Error = AppError;

    fn try_from(row: WorkOrderRow) -> Result<Self, Self::Error> {
        let status = WorkOrderStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unknown work order status '{}' in store", row.status))
        })?;
        Ok(WorkOrder {
            id: row.id,
            work_order_number: row.work_order_number,
            sales_order_id: row.sales_order_id,
            case_id: row.case_id,
            status,
            scheduled_start: row.scheduled_start,
            scheduled_end: row.scheduled_end,
            notes: row.notes,
            created_by: row.created_by,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const WORK_ORDER_COLUMNS: &str = "id, work_order_number, sales_order_id, case_id, status, \
                                  scheduled_start, scheduled_end, notes, created_by, archived, \
                                  created_at, updated_at";

/// Input for scheduling a work order
#[derive(Debug, Deserialize)]
pub struct ScheduleWorkOrderInput {
    pub scheduled_start: Option<NaiveDate>,
    pub scheduled_end: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl WorkOrderService {
    /// Create a new WorkOrderService instance
    pub fn new(db: PgPool) -> Self {
        let history = HistoryService::new(db.clone());
        Self { db, history }
    }

    /// Get a work order by ID
    pub async fn get_work_order(&self, work_order_id: Uuid) -> AppResult<WorkOrder> {
        let row = sqlx::query_as::<_, WorkOrderRow>(&format!(
            "SELECT {} FROM work_orders WHERE id = $1",
            WORK_ORDER_COLUMNS
        ))
        .bind(work_order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Work order".to_string()))?;

        row.try_into()
    }

    /// List all non-archived work orders, newest first
    pub async fn list_work_orders(&self) -> AppResult<Vec<WorkOrder>> {
        let rows = sqlx::query_as::<_, WorkOrderRow>(&format!(
            "SELECT {} FROM work_orders WHERE archived = FALSE ORDER BY created_at DESC",
            WORK_ORDER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Update a work order's schedule and notes
    pub async fn schedule_work_order(
        &self,
        work_order_id: Uuid,
        input: ScheduleWorkOrderInput,
    ) -> AppResult<WorkOrder> {
        let existing = self.get_work_order(work_order_id).await?;

        if let (Some(start), Some(end)) = (
            input.scheduled_start.or(existing.scheduled_start),
            input.scheduled_end.or(existing.scheduled_end),
        ) {
            if end < start {
                return Err(AppError::Validation {
                    field: "scheduled_end".to_string(),
                    message: "Scheduled end cannot precede scheduled start".to_string(),
                });
            }
        }

        let scheduled_start = input.scheduled_start.or(existing.scheduled_start);
        let scheduled_end = input.scheduled_end.or(existing.scheduled_end);
        let notes = input.notes.or(existing.notes);

        let row = sqlx::query_as::<_, WorkOrderRow>(&format!(
            r#"
            UPDATE work_orders
            SET scheduled_start = $1, scheduled_end = $2, notes = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            WORK_ORDER_COLUMNS
        ))
        .bind(scheduled_start)
        .bind(scheduled_end)
        .bind(&notes)
        .bind(work_order_id)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    /// Move a work order to a new status, checked against the allowed moves
    pub async fn update_status(
        &self,
        work_order_id: Uuid,
        target: &str,
        actor_id: Uuid,
    ) -> AppResult<WorkOrder> {
        let target_status = match WorkOrderStatus::from_str(target) {
            Some(status) => status,
            None => {
                let msg = shared::validate_status(DocumentType::WorkOrder, target)
                    .err()
                    .unwrap_or_else(|| format!("invalid status '{}'", target));
                return Err(AppError::ValidationError(msg));
            }
        };

        let existing = self.get_work_order(work_order_id).await?;

        if !existing.status.can_move_to(target_status) {
            return Err(AppError::InvalidStateTransition(format!(
                "work order cannot move from '{}' to '{}'",
                existing.status, target_status
            )));
        }

        // Guarded update so a concurrent move fails instead of overwriting
        let row = sqlx::query_as::<_, WorkOrderRow>(&format!(
            r#"
            UPDATE work_orders
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {}
            "#,
            WORK_ORDER_COLUMNS
        ))
        .bind(target_status.as_str())
        .bind(work_order_id)
        .bind(existing.status.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Conflict {
            resource: "work_order".to_string(),
            message: format!(
                "work order was concurrently modified, no longer in '{}'",
                existing.status
            ),
        })?;

        self.history
            .record_best_effort(
                DocumentType::WorkOrder,
                work_order_id,
                target_status.as_str(),
                None,
                actor_id,
            )
            .await;

        row.try_into()
    }
}
