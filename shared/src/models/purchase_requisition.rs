//! Purchase requisition models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::DocumentStatus;

/// A request to procure material, usually raised against a work order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequisition {
    pub id: Uuid,
    pub requisition_number: String,
    pub work_order_id: Option<Uuid>,
    pub purpose: String,
    pub status: DocumentStatus,
    pub total_estimated_cost: Decimal,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
