//! Case lifecycle and totals property tests
//!
//! Properties covered:
//! - The transition table is a single forward chain with no skips or cycles
//! - Every transition names its trigger document and mandated child document
//! - Document totals are always the sum of their line amounts

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::{
    document_total, expected_prior_state, is_legal_transition, line_amount, transition_to,
    CaseState, DocumentType, TransitionSideEffect, CASE_TRANSITIONS,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

fn case_state_strategy() -> impl Strategy<Value = CaseState> {
    prop_oneof![
        Just(CaseState::Estimation),
        Just(CaseState::Quotation),
        Just(CaseState::Order),
        Just(CaseState::Production),
    ]
}

/// Generate non-negative money amounts with two decimal places
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate positive quantities with up to three decimal places
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|milli| Decimal::new(milli, 3))
}

fn line_strategy() -> impl Strategy<Value = (Decimal, Decimal)> {
    (quantity_strategy(), amount_strategy())
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Legal transitions move exactly one step forward in lifecycle order
    #[test]
    fn test_transitions_are_single_forward_steps(
        from in case_state_strategy(),
        to in case_state_strategy(),
    ) {
        let order = CaseState::all();
        let from_idx = order.iter().position(|s| *s == from).unwrap();
        let to_idx = order.iter().position(|s| *s == to).unwrap();

        if is_legal_transition(from, to) {
            prop_assert_eq!(to_idx, from_idx + 1);
        } else {
            prop_assert_ne!(to_idx, from_idx + 1);
        }
    }

    /// Every target state has exactly one prior state, or none for the start
    #[test]
    fn test_expected_prior_state_matches_table(target in case_state_strategy()) {
        match expected_prior_state(target) {
            Some(prior) => prop_assert!(is_legal_transition(prior, target)),
            None => prop_assert_eq!(target, CaseState::Estimation),
        }
    }

    /// Totals equal the sum of line amounts, for any set of lines
    #[test]
    fn test_document_total_sums_lines(lines in prop::collection::vec(line_strategy(), 0..30)) {
        let expected: Decimal = lines.iter().map(|(q, p)| *q * *p).sum();
        prop_assert_eq!(document_total(&lines), expected);
    }

    /// Totals of non-negative lines are never negative
    #[test]
    fn test_document_total_non_negative(lines in prop::collection::vec(line_strategy(), 0..30)) {
        prop_assert!(document_total(&lines) >= Decimal::ZERO);
    }

    /// A document's total is order-independent over its lines
    #[test]
    fn test_document_total_order_independent(
        mut lines in prop::collection::vec(line_strategy(), 1..20)
    ) {
        let total = document_total(&lines);
        lines.reverse();
        prop_assert_eq!(document_total(&lines), total);
    }

    /// Line amounts scale linearly with quantity
    #[test]
    fn test_line_amount_scales(quantity in quantity_strategy(), price in amount_strategy()) {
        prop_assert_eq!(
            line_amount(quantity * Decimal::from(2), price),
            line_amount(quantity, price) * Decimal::from(2)
        );
    }
}

// ============================================================================
// Unit Tests (transition table shape)
// ============================================================================

#[test]
fn transition_table_covers_every_non_initial_state() {
    assert!(transition_to(CaseState::Estimation).is_none());
    assert!(transition_to(CaseState::Quotation).is_some());
    assert!(transition_to(CaseState::Order).is_some());
    assert!(transition_to(CaseState::Production).is_some());
}

#[test]
fn every_transition_mandates_a_child_document() {
    for transition in CASE_TRANSITIONS {
        assert!(
            transition.side_effect.is_some(),
            "transition {} -> {} has no side effect",
            transition.from,
            transition.to
        );
    }
}

#[test]
fn triggers_and_side_effects_line_up() {
    let t = transition_to(CaseState::Quotation).unwrap();
    assert_eq!(t.trigger, DocumentType::Estimation);
    assert_eq!(t.side_effect, Some(TransitionSideEffect::CreateQuotation));

    let t = transition_to(CaseState::Order).unwrap();
    assert_eq!(t.trigger, DocumentType::Quotation);
    assert_eq!(t.side_effect, Some(TransitionSideEffect::CreateSalesOrder));

    let t = transition_to(CaseState::Production).unwrap();
    assert_eq!(t.trigger, DocumentType::SalesOrder);
    assert_eq!(t.side_effect, Some(TransitionSideEffect::CreateWorkOrder));
}

#[test]
fn no_transition_reenters_the_initial_state() {
    assert!(CASE_TRANSITIONS
        .iter()
        .all(|t| t.to != CaseState::Estimation));
}
