//! Document numbering helpers
//!
//! Pure functions behind the sequence allocator: financial-year derivation
//! and document-number formatting. The atomic counter itself lives in the
//! backend's sequence service; everything here is side-effect free so it can
//! be driven with an explicit "now" in tests.

use chrono::{Datelike, NaiveDate};

use crate::types::DocumentType;

/// Default start month of the financial year (April)
pub const DEFAULT_FISCAL_START_MONTH: u32 = 4;

/// Counter width in formatted document numbers
pub const COUNTER_WIDTH: usize = 3;

/// Derive the compact financial-year code for a reference date.
///
/// The fiscal year runs from `start_month` to the month before it in the
/// next calendar year. The code is the last two digits of both calendar
/// years: 2025-04-01 with an April boundary falls in FY 2025/26 -> "2526",
/// while 2025-03-31 falls in FY 2024/25 -> "2425".
pub fn financial_year_code(reference_date: NaiveDate, start_month: u32) -> String {
    let year = reference_date.year();
    let (first, second) = if reference_date.month() >= start_month {
        (year, year + 1)
    } else {
        (year - 1, year)
    };
    format!("{:02}{:02}", first.rem_euclid(100), second.rem_euclid(100))
}

/// Format a document number: `{ORG}/{TYPE}/{FY}/{COUNTER:03}`.
///
/// Counters are zero-padded to three digits. Values above 999 keep all of
/// their digits instead of wrapping, so numbers stay unique within a
/// (type, year) pair at the cost of a wider counter field.
pub fn format_document_number(
    org_prefix: &str,
    document_type: DocumentType,
    financial_year: &str,
    counter: i64,
) -> String {
    format!(
        "{}/{}/{}/{:0width$}",
        org_prefix,
        document_type.code(),
        financial_year,
        counter,
        width = COUNTER_WIDTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiscal_year_day_before_boundary() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(financial_year_code(date, DEFAULT_FISCAL_START_MONTH), "2425");
    }

    #[test]
    fn fiscal_year_on_boundary() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(financial_year_code(date, DEFAULT_FISCAL_START_MONTH), "2526");
    }

    #[test]
    fn fiscal_year_late_in_year() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
        assert_eq!(financial_year_code(date, DEFAULT_FISCAL_START_MONTH), "2526");
    }

    #[test]
    fn fiscal_year_century_rollover() {
        let date = NaiveDate::from_ymd_opt(2099, 6, 1).unwrap();
        assert_eq!(financial_year_code(date, DEFAULT_FISCAL_START_MONTH), "9900");
    }

    #[test]
    fn document_number_format() {
        let number = format_document_number("MEPL", DocumentType::Quotation, "2526", 7);
        assert_eq!(number, "MEPL/Q/2526/007");
    }

    #[test]
    fn document_number_counter_widens_past_999() {
        let number = format_document_number("MEPL", DocumentType::SalesOrder, "2526", 1042);
        assert_eq!(number, "MEPL/SO/2526/1042");
    }
}
