//! Estimation models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::DocumentStatus;

/// A cost estimation prepared against an enquiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimation {
    pub id: Uuid,
    pub estimation_number: String,
    pub enquiry_id: Uuid,
    pub case_id: Uuid,
    pub status: DocumentStatus,
    pub total_cost: Decimal,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One costed line of an estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationItem {
    pub id: Uuid,
    pub estimation_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}
