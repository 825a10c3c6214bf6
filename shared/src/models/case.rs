//! Case lifecycle models
//!
//! A case aggregates one sales opportunity from enquiry to production. Its
//! state only moves along the transition table declared here; the backend
//! orchestrator is the single writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::DocumentType;

/// Stage of a case in the sales-to-production lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseState {
    Estimation,
    Quotation,
    Order,
    Production,
}

impl CaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseState::Estimation => "estimation",
            CaseState::Quotation => "quotation",
            CaseState::Order => "order",
            CaseState::Production => "production",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "estimation" => Some(CaseState::Estimation),
            "quotation" => Some(CaseState::Quotation),
            "order" => Some(CaseState::Order),
            "production" => Some(CaseState::Production),
            _ => None,
        }
    }

    /// All states, in forward lifecycle order
    pub fn all() -> &'static [CaseState] {
        &[
            CaseState::Estimation,
            CaseState::Quotation,
            CaseState::Order,
            CaseState::Production,
        ]
    }
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Child document the orchestrator must create when a transition commits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransitionSideEffect {
    CreateQuotation,
    CreateSalesOrder,
    CreateWorkOrder,
}

/// One row of the case transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseTransition {
    pub from: CaseState,
    pub to: CaseState,
    /// Document whose approval legally triggers this transition
    pub trigger: DocumentType,
    pub side_effect: Option<TransitionSideEffect>,
}

/// The full transition table for the case state machine.
///
/// Every legal transition and the child document it mandates is enumerated
/// here so the graph is inspectable and testable in one place.
pub const CASE_TRANSITIONS: &[CaseTransition] = &[
    CaseTransition {
        from: CaseState::Estimation,
        to: CaseState::Quotation,
        trigger: DocumentType::Estimation,
        side_effect: Some(TransitionSideEffect::CreateQuotation),
    },
    CaseTransition {
        from: CaseState::Quotation,
        to: CaseState::Order,
        trigger: DocumentType::Quotation,
        side_effect: Some(TransitionSideEffect::CreateSalesOrder),
    },
    CaseTransition {
        from: CaseState::Order,
        to: CaseState::Production,
        trigger: DocumentType::SalesOrder,
        side_effect: Some(TransitionSideEffect::CreateWorkOrder),
    },
];

/// Look up the transition that lands in `target`, if the graph defines one
pub fn transition_to(target: CaseState) -> Option<&'static CaseTransition> {
    CASE_TRANSITIONS.iter().find(|t| t.to == target)
}

/// Whether `from -> to` is a legal case transition
pub fn is_legal_transition(from: CaseState, to: CaseState) -> bool {
    CASE_TRANSITIONS
        .iter()
        .any(|t| t.from == from && t.to == to)
}

/// The state a case must currently be in before it may enter `target`
pub fn expected_prior_state(target: CaseState) -> Option<CaseState> {
    transition_to(target).map(|t| t.from)
}

/// A tracked sales-to-production opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    /// Allocator-issued, immutable (e.g., "MEPL/CS/2526/001")
    pub case_number: String,
    pub current_state: CaseState,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only record of a single case state change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStateTransitionRecord {
    pub id: Uuid,
    pub case_id: Uuid,
    pub from_state: CaseState,
    pub to_state: CaseState,
    pub trigger_entity_type: String,
    pub trigger_entity_id: Uuid,
    pub actor_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit entry, parallel to but independent of state transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseHistoryEntry {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub actor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_is_legal() {
        assert!(is_legal_transition(CaseState::Estimation, CaseState::Quotation));
        assert!(is_legal_transition(CaseState::Quotation, CaseState::Order));
        assert!(is_legal_transition(CaseState::Order, CaseState::Production));
    }

    #[test]
    fn skipping_states_is_illegal() {
        assert!(!is_legal_transition(CaseState::Estimation, CaseState::Order));
        assert!(!is_legal_transition(CaseState::Quotation, CaseState::Production));
    }

    #[test]
    fn backward_moves_are_illegal() {
        assert!(!is_legal_transition(CaseState::Order, CaseState::Quotation));
        assert!(!is_legal_transition(CaseState::Production, CaseState::Estimation));
    }

    #[test]
    fn every_target_has_one_prior_state() {
        assert_eq!(expected_prior_state(CaseState::Quotation), Some(CaseState::Estimation));
        assert_eq!(expected_prior_state(CaseState::Order), Some(CaseState::Quotation));
        assert_eq!(expected_prior_state(CaseState::Production), Some(CaseState::Order));
        assert_eq!(expected_prior_state(CaseState::Estimation), None);
    }

    #[test]
    fn quotation_approval_creates_sales_order() {
        let t = transition_to(CaseState::Order).unwrap();
        assert_eq!(t.trigger, DocumentType::Quotation);
        assert_eq!(t.side_effect, Some(TransitionSideEffect::CreateSalesOrder));
    }
}
