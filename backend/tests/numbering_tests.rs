//! Document numbering property tests
//!
//! Properties covered:
//! - Financial-year codes follow the fiscal boundary, not the calendar year
//! - Formatted document numbers are unique for unique counters
//! - Counter padding holds to three digits and widens past 999

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use shared::{
    financial_year_code, format_document_number, DocumentType, DEFAULT_FISCAL_START_MONTH,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid calendar dates within the platform's working range
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2099, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Generate valid organisation prefixes (2-10 uppercase alphanumeric)
fn org_prefix_strategy() -> impl Strategy<Value = String> {
    "[A-Z0-9]{2,10}"
}

/// Generate document types
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

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Financial-year codes are always four digits
    #[test]
    fn test_financial_year_code_is_four_digits(date in date_strategy()) {
        let code = financial_year_code(date, DEFAULT_FISCAL_START_MONTH);
        prop_assert_eq!(code.len(), 4);
        prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    /// The two halves of the code are consecutive years modulo 100
    #[test]
    fn test_financial_year_halves_are_consecutive(date in date_strategy()) {
        let code = financial_year_code(date, DEFAULT_FISCAL_START_MONTH);
        let first: u32 = code[..2].parse().unwrap();
        let second: u32 = code[2..].parse().unwrap();
        prop_assert_eq!((first + 1) % 100, second);
    }

    /// Dates in the same fiscal year share a code; the boundary splits them
    #[test]
    fn test_fiscal_boundary_splits_years(year in 2000i32..2099) {
        let before = NaiveDate::from_ymd_opt(year, 3, 31).unwrap();
        let after = NaiveDate::from_ymd_opt(year, 4, 1).unwrap();
        let code_before = financial_year_code(before, DEFAULT_FISCAL_START_MONTH);
        let code_after = financial_year_code(after, DEFAULT_FISCAL_START_MONTH);
        prop_assert_ne!(code_before, code_after);
    }

    /// Unique counters produce unique document numbers within a (type, year)
    #[test]
    fn test_document_number_uniqueness(
        counters in prop::collection::hash_set(1i64..100_000, 10..100),
        prefix in org_prefix_strategy(),
        document_type in document_type_strategy(),
    ) {
        let numbers: Vec<String> = counters
            .iter()
            .map(|c| format_document_number(&prefix, document_type, "2526", *c))
            .collect();

        let unique: HashSet<&String> = numbers.iter().collect();
        prop_assert_eq!(unique.len(), numbers.len());
    }

    /// Document numbers have four slash-separated segments in order
    #[test]
    fn test_document_number_format(
        prefix in org_prefix_strategy(),
        document_type in document_type_strategy(),
        counter in 1i64..100_000,
    ) {
        let number = format_document_number(&prefix, document_type, "2526", counter);
        let parts: Vec<&str> = number.split('/').collect();

        prop_assert_eq!(parts.len(), 4);
        prop_assert_eq!(parts[0], &prefix);
        prop_assert_eq!(parts[1], document_type.code());
        prop_assert_eq!(parts[2], "2526");
        prop_assert!(parts[3].len() >= 3);
        prop_assert_eq!(parts[3].parse::<i64>().unwrap(), counter);
    }

    /// Counters up to 999 are zero-padded to exactly three digits
    #[test]
    fn test_counter_padding_below_1000(counter in 1i64..1000) {
        let number = format_document_number("MEPL", DocumentType::Quotation, "2526", counter);
        let counter_part = number.rsplit('/').next().unwrap();
        prop_assert_eq!(counter_part.len(), 3);
    }

    /// Counters past 999 keep all digits instead of wrapping
    #[test]
    fn test_counter_widens_past_999(counter in 1000i64..10_000_000) {
        let number = format_document_number("MEPL", DocumentType::Quotation, "2526", counter);
        let counter_part = number.rsplit('/').next().unwrap();
        prop_assert_eq!(counter_part.parse::<i64>().unwrap(), counter);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn known_fiscal_year_examples() {
    let inside = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
    assert_eq!(financial_year_code(inside, DEFAULT_FISCAL_START_MONTH), "2526");

    let early = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
    assert_eq!(financial_year_code(early, DEFAULT_FISCAL_START_MONTH), "2526");
}

#[test]
fn known_document_number_examples() {
    assert_eq!(
        format_document_number("MEPL", DocumentType::Quotation, "2526", 14),
        "MEPL/Q/2526/014"
    );
    assert_eq!(
        format_document_number("MEPL", DocumentType::Case, "2526", 1),
        "MEPL/CS/2526/001"
    );
    assert_eq!(
        format_document_number("MEPL", DocumentType::WorkOrder, "2425", 999),
        "MEPL/WO/2425/999"
    );
}
