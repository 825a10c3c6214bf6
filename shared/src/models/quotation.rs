//! Quotation models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::DocumentStatus;

/// A priced quotation issued to the customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub id: Uuid,
    pub quotation_number: String,
    pub case_id: Option<Uuid>,
    pub estimation_id: Option<Uuid>,
    pub customer_name: String,
    pub status: DocumentStatus,
    /// Always derived from line items, never entered directly
    pub total_amount: Decimal,
    pub valid_until: Option<NaiveDate>,
    pub created_by: Uuid,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One priced line of a quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationItem {
    pub id: Uuid,
    pub quotation_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

/// Amount of one line
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

/// Total of a document, recomputed from its lines.
/// Downstream documents derive their totals through this rather than copying
/// a cached figure, so the amount stays independently auditable.
pub fn document_total(lines: &[(Decimal, Decimal)]) -> Decimal {
    lines
        .iter()
        .map(|(quantity, unit_price)| line_amount(*quantity, *unit_price))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_line_amounts() {
        let lines = vec![
            (Decimal::from(2), Decimal::new(10050, 2)), // 2 x 100.50
            (Decimal::from(1), Decimal::from(45)),
        ];
        assert_eq!(document_total(&lines), Decimal::new(24600, 2));
    }

    #[test]
    fn empty_document_totals_zero() {
        assert_eq!(document_total(&[]), Decimal::ZERO);
    }
}
