//! Document number allocation service
//!
//! Issues the next value of a strictly increasing, per-(document type,
//! financial year) counter and formats it into a human-readable document
//! number such as "MEPL/Q/2526/014".
//!
//! The read-increment-persist step is a single atomic upsert: an insert
//! that increments on conflict and returns the now-current value. Two
//! concurrent callers for the same (type, year) pair can therefore never
//! observe the same counter, in-process or across service instances. A
//! failed statement consumes no counter.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{AppError, AppResult};
use shared::{financial_year_code, format_document_number, DocumentType};

/// Sequence service backing all document numbering
#[derive(Clone)]
pub struct SequenceService {
    db: PgPool,
    org_prefix: String,
    fiscal_start_month: u32,
}

impl SequenceService {
    /// Create a new SequenceService instance
    pub fn new(db: PgPool, org_prefix: String, fiscal_start_month: u32) -> Self {
        Self {
            db,
            org_prefix,
            fiscal_start_month,
        }
    }

    /// Financial-year code for today
    pub fn current_financial_year(&self) -> String {
        financial_year_code(Utc::now().date_naive(), self.fiscal_start_month)
    }

    /// Allocate the next document number in its own transaction.
    /// Any failure on the allocation path surfaces as an Allocation error.
    pub async fn next_document_number(&self, document_type: DocumentType) -> AppResult<String> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Allocation(e.to_string()))?;
        let number = self
            .next_document_number_in(&mut tx, document_type)
            .await?;
        tx.commit()
            .await
            .map_err(|e| AppError::Allocation(e.to_string()))?;
        Ok(number)
    }

    /// Allocate the next document number inside an existing transaction.
    ///
    /// Used by the workflow orchestrator so that a rolled-back transition
    /// also releases the row lock without consuming the counter.
    pub async fn next_document_number_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document_type: DocumentType,
    ) -> AppResult<String> {
        let financial_year = self.current_financial_year();
        let counter = self
            .next_counter_in(tx, document_type, &financial_year)
            .await?;

        Ok(format_document_number(
            &self.org_prefix,
            document_type,
            &financial_year,
            counter,
        ))
    }

    /// Atomic increment-and-fetch of the (type, year) counter.
    /// The sequence row is created lazily on first allocation.
    async fn next_counter_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document_type: DocumentType,
        financial_year: &str,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO document_sequences (document_type, financial_year, last_value)
            VALUES ($1, $2, 1)
            ON CONFLICT (document_type, financial_year)
            DO UPDATE SET last_value = document_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(document_type.code())
        .bind(financial_year)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::Allocation(e.to_string()))
    }
}
