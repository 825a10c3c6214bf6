//! Sales order models
//!
//! Sales orders are never created directly; the workflow orchestrator
//! instantiates them from an approved quotation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::DocumentStatus;

/// A confirmed sales order derived from an approved quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: Uuid,
    pub order_number: String,
    pub quotation_id: Uuid,
    pub case_id: Option<Uuid>,
    pub customer_name: String,
    pub status: DocumentStatus,
    /// Recomputed from line items at creation time
    pub total_amount: Decimal,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a sales order, copied from the source quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderItem {
    pub id: Uuid,
    pub sales_order_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}
