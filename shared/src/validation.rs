//! Validation utilities for the Sales Workflow Management Platform
//!
//! Every entity-level status write is checked against the allow-list here
//! before it is persisted.

use rust_decimal::Decimal;

use crate::types::DocumentType;

// ============================================================================
// Status allow-lists
// ============================================================================

const APPROVAL_FLOW_STATUSES: &[&str] =
    &["draft", "pending_approval", "approved", "rejected", "cancelled"];
const WORK_ORDER_STATUSES: &[&str] = &["planned", "in_progress", "completed", "cancelled"];
const TICKET_STATUSES: &[&str] = &["open", "in_progress", "resolved", "closed"];
const CASE_STATES: &[&str] = &["estimation", "quotation", "order", "production"];

/// Permitted status values for an entity
pub fn allowed_statuses(entity: DocumentType) -> &'static [&'static str] {
    match entity {
        DocumentType::Case => CASE_STATES,
        DocumentType::WorkOrder => WORK_ORDER_STATUSES,
        DocumentType::Ticket => TICKET_STATUSES,
        DocumentType::Enquiry
        | DocumentType::Estimation
        | DocumentType::Quotation
        | DocumentType::SalesOrder
        | DocumentType::PurchaseRequisition => APPROVAL_FLOW_STATUSES,
    }
}

/// Check a status value against the entity's allow-list.
/// The error names the offending value and the permitted set.
pub fn validate_status(entity: DocumentType, status: &str) -> Result<(), String> {
    let allowed = allowed_statuses(entity);
    if allowed.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "invalid status '{}' for {}, permitted: [{}]",
            status,
            entity.as_str(),
            allowed.join(", ")
        ))
    }
}

// ============================================================================
// Line item validations
// ============================================================================

/// Validate a priced or costed line item
pub fn validate_line_item(
    description: &str,
    quantity: Decimal,
    unit_amount: Decimal,
) -> Result<(), &'static str> {
    if description.trim().is_empty() {
        return Err("Line item description cannot be empty");
    }
    if quantity <= Decimal::ZERO {
        return Err("Line item quantity must be positive");
    }
    if unit_amount < Decimal::ZERO {
        return Err("Line item unit amount cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate organisation prefix used in document numbers (2-10 uppercase alphanumeric)
pub fn validate_org_prefix(prefix: &str) -> Result<(), &'static str> {
    if prefix.len() < 2 {
        return Err("Organisation prefix must be at least 2 characters");
    }
    if prefix.len() > 10 {
        return Err("Organisation prefix must be at most 10 characters");
    }
    if !prefix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Organisation prefix must be uppercase alphanumeric only");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotation_statuses() {
        assert!(validate_status(DocumentType::Quotation, "pending_approval").is_ok());
        assert!(validate_status(DocumentType::Quotation, "shipped").is_err());
    }

    #[test]
    fn status_error_names_value_and_permitted_set() {
        let err = validate_status(DocumentType::WorkOrder, "open").unwrap_err();
        assert!(err.contains("'open'"));
        assert!(err.contains("planned"));
        assert!(err.contains("completed"));
    }

    #[test]
    fn case_states_are_not_document_statuses() {
        assert!(validate_status(DocumentType::Case, "order").is_ok());
        assert!(validate_status(DocumentType::Case, "approved").is_err());
    }

    #[test]
    fn line_item_rules() {
        assert!(validate_line_item("Flange plate", Decimal::from(4), Decimal::from(120)).is_ok());
        assert!(validate_line_item("", Decimal::from(1), Decimal::from(1)).is_err());
        assert!(validate_line_item("Bolt", Decimal::ZERO, Decimal::from(1)).is_err());
        assert!(validate_line_item("Bolt", Decimal::from(1), Decimal::from(-1)).is_err());
    }

    #[test]
    fn org_prefix_rules() {
        assert!(validate_org_prefix("MEPL").is_ok());
        assert!(validate_org_prefix("m").is_err());
        assert!(validate_org_prefix("mepl").is_err());
    }
}
