//! Status allow-list and lifecycle tests
//!
//! Properties covered:
//! - Allow-lists accept exactly their own members
//! - Rejections name the offending value and the permitted set
//! - Work order and ticket lifecycles respect their terminal states

use proptest::prelude::*;

use shared::{
    allowed_statuses, validate_status, DocumentStatus, DocumentType, TicketStatus,
    WorkOrderStatus,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

fn document_type_strategy() -> impl Strategy<Value = DocumentType> {
    prop_oneof![
        Just(DocumentType::Case),
        Just(DocumentType::Enquiry),
        Just(DocumentType::Estimation),
        Just(DocumentType::Quotation),
        Just(DocumentType::SalesOrder),
        Just(DocumentType::WorkOrder),
        Just(DocumentType::PurchaseRequisition),
        Just(DocumentType::Ticket),
    ]
}

/// Generate arbitrary lowercase words that may or may not be valid statuses
fn word_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,20}"
}

fn work_order_status_strategy() -> impl Strategy<Value = WorkOrderStatus> {
    prop_oneof![
        Just(WorkOrderStatus::Planned),
        Just(WorkOrderStatus::InProgress),
        Just(WorkOrderStatus::Completed),
        Just(WorkOrderStatus::Cancelled),
    ]
}

fn ticket_status_strategy() -> impl Strategy<Value = TicketStatus> {
    prop_oneof![
        Just(TicketStatus::Open),
        Just(TicketStatus::InProgress),
        Just(TicketStatus::Resolved),
        Just(TicketStatus::Closed),
    ]
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// A status passes validation exactly when the allow-list contains it
    #[test]
    fn test_allow_list_membership(
        entity in document_type_strategy(),
        status in word_strategy(),
    ) {
        let allowed = allowed_statuses(entity);
        let result = validate_status(entity, &status);
        prop_assert_eq!(result.is_ok(), allowed.contains(&status.as_str()));
    }

    /// Every member of every allow-list validates
    #[test]
    fn test_all_allowed_statuses_validate(entity in document_type_strategy()) {
        for status in allowed_statuses(entity) {
            prop_assert!(validate_status(entity, status).is_ok());
        }
    }

    /// Rejection messages name the offending value and the entity
    #[test]
    fn test_rejection_message_names_value(
        entity in document_type_strategy(),
        status in word_strategy(),
    ) {
        if let Err(msg) = validate_status(entity, &status) {
            let quoted = format!("'{}'", status);
            prop_assert!(msg.contains(&quoted));
            prop_assert!(msg.contains(entity.as_str()));
        }
    }

    /// Completed and cancelled work orders accept no further moves
    #[test]
    fn test_work_order_terminal_states(to in work_order_status_strategy()) {
        prop_assert!(!WorkOrderStatus::Completed.can_move_to(to));
        prop_assert!(!WorkOrderStatus::Cancelled.can_move_to(to));
    }

    /// Closed tickets accept no further moves
    #[test]
    fn test_closed_ticket_is_terminal(to in ticket_status_strategy()) {
        prop_assert!(!TicketStatus::Closed.can_move_to(to));
    }

    /// No status may move to itself
    #[test]
    fn test_no_self_moves(
        wo in work_order_status_strategy(),
        tk in ticket_status_strategy(),
    ) {
        prop_assert!(!wo.can_move_to(wo));
        prop_assert!(!tk.can_move_to(tk));
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn approval_flow_gates() {
    assert!(DocumentStatus::Draft.allows_approval());
    assert!(DocumentStatus::PendingApproval.allows_approval());
    assert!(!DocumentStatus::Approved.allows_approval());

    assert!(DocumentStatus::PendingApproval.allows_rejection());
    assert!(!DocumentStatus::Draft.allows_rejection());
    assert!(!DocumentStatus::Approved.allows_rejection());
}

#[test]
fn work_order_happy_path() {
    assert!(WorkOrderStatus::Planned.can_move_to(WorkOrderStatus::InProgress));
    assert!(WorkOrderStatus::InProgress.can_move_to(WorkOrderStatus::Completed));
    assert!(!WorkOrderStatus::Planned.can_move_to(WorkOrderStatus::Completed));
}

#[test]
fn ticket_reopen_allowed_once_resolved() {
    assert!(TicketStatus::Resolved.can_move_to(TicketStatus::InProgress));
    assert!(TicketStatus::Resolved.can_move_to(TicketStatus::Closed));
    assert!(!TicketStatus::Open.can_move_to(TicketStatus::Closed));
}

#[test]
fn case_states_use_their_own_vocabulary() {
    assert!(validate_status(DocumentType::Case, "production").is_ok());
    assert!(validate_status(DocumentType::Case, "draft").is_err());
    assert!(validate_status(DocumentType::Quotation, "estimation").is_err());
}
