//! Sales order management service
//!
//! Sales orders are only ever created by the workflow orchestrator from an
//! approved quotation; this service covers reads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{DocumentStatus, SalesOrder, SalesOrderItem};

/// Sales order service
#[derive(Clone)]
pub struct SalesOrderService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct SalesOrderRow {
    id: Uuid,
    order_number: String,
    quotation_id: Uuid,
    case_id: Option<Uuid>,
    customer_name: String,
    status: String,
    total_amount: Decimal,
    created_by: Uuid,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SalesOrderRow> for SalesOrder {
    type Error = AppError;

    fn try_from(row: SalesOrderRow) -> Result<Self, Self::Error> {
        let status = DocumentStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!("unknown sales order status '{}' in store", row.status))
        })?;
        Ok(SalesOrder {
            id: row.id,
            order_number: row.order_number,
            quotation_id: row.quotation_id,
            case_id: row.case_id,
            customer_name: row.customer_name,
            status,
            total_amount: row.total_amount,
            created_by: row.created_by,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            archived: row.archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SALES_ORDER_COLUMNS: &str = "id, order_number, quotation_id, case_id, customer_name, \
                                   status, total_amount, created_by, approved_by, approved_at, \
                                   archived, created_at, updated_at";

/// Sales order with its line items
#[derive(Debug, Clone, Serialize)]
pub struct SalesOrderWithItems {
    #[serde(flatten)]
    pub sales_order: SalesOrder,
    pub items: Vec<SalesOrderItem>,
}

impl SalesOrderService {
    /// Create a new SalesOrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a sales order with its line items
    pub async fn get_sales_order(&self, sales_order_id: Uuid) -> AppResult<SalesOrderWithItems> {
        let row = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "SELECT {} FROM sales_orders WHERE id = $1",
            SALES_ORDER_COLUMNS
        ))
        .bind(sales_order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sales order".to_string()))?;

        let sales_order: SalesOrder = row.try_into()?;

        let items = sqlx::query_as::<_, (Uuid, Uuid, String, Decimal, Decimal)>(
            r#"
            SELECT id, sales_order_id, description, quantity, unit_price
            FROM sales_order_items
            WHERE sales_order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(sales_order_id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|(id, sales_order_id, description, quantity, unit_price)| SalesOrderItem {
            id,
            sales_order_id,
            description,
            quantity,
            unit_price,
        })
        .collect();

        Ok(SalesOrderWithItems { sales_order, items })
    }

    /// List all non-archived sales orders, newest first
    pub async fn list_sales_orders(&self) -> AppResult<Vec<SalesOrder>> {
        let rows = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "SELECT {} FROM sales_orders WHERE archived = FALSE ORDER BY created_at DESC",
            SALES_ORDER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Sales orders belonging to one case
    pub async fn get_sales_orders_by_case(&self, case_id: Uuid) -> AppResult<Vec<SalesOrder>> {
        let rows = sqlx::query_as::<_, SalesOrderRow>(&format!(
            "SELECT {} FROM sales_orders WHERE case_id = $1 ORDER BY created_at DESC",
            SALES_ORDER_COLUMNS
        ))
        .bind(case_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}
