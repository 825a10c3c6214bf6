//! Enquiry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer enquiry, the first record of a case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: Uuid,
    /// Allocator-issued number (e.g., "MEPL/EQ/2526/014")
    pub enquiry_number: String,
    pub case_id: Uuid,
    pub customer_name: String,
    pub contact_email: Option<String>,
    pub subject: String,
    pub details: Option<String>,
    pub created_by: Uuid,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
