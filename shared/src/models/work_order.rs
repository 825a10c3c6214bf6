//! Work order models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::WorkOrderStatus;

/// A manufacturing work order created from an approved sales order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: Uuid,
    pub work_order_number: String,
    pub sales_order_id: Uuid,
    pub case_id: Option<Uuid>,
    pub status: WorkOrderStatus,
    pub scheduled_start: Option<NaiveDate>,
    pub scheduled_end: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
