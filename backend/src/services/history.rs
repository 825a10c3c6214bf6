//! Audit history service
//!
//! Append-only history rows recording significant actions against an
//! entity, parallel to but independent of the case state-transition log.
//! Rows are never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{CaseHistoryEntry, DocumentType};

/// History service for audit trail entries
#[derive(Clone)]
pub struct HistoryService {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    entity_type: String,
    entity_id: Uuid,
    status: String,
    note: Option<String>,
    actor_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for CaseHistoryEntry {
    fn from(row: HistoryRow) -> Self {
        CaseHistoryEntry {
            id: row.id,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            status: row.status,
            note: row.note,
            actor_id: row.actor_id,
            created_at: row.created_at,
        }
    }
}

impl HistoryService {
    /// Create a new HistoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a history entry in its own transaction
    pub async fn record(
        &self,
        entity_type: DocumentType,
        entity_id: Uuid,
        status: &str,
        note: Option<&str>,
        actor_id: Uuid,
    ) -> AppResult<()> {
        insert_history(&self.db, entity_type, entity_id, status, note, actor_id).await
    }

    /// Record a history entry inside an existing transaction.
    /// The caller's transition aborts if this insert fails.
    pub async fn record_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entity_type: DocumentType,
        entity_id: Uuid,
        status: &str,
        note: Option<&str>,
        actor_id: Uuid,
    ) -> AppResult<()> {
        insert_history(&mut **tx, entity_type, entity_id, status, note, actor_id).await
    }

    /// Best-effort variant for explicitly non-critical notes.
    /// Never applied to case-state or child-document writes; a failure is
    /// logged and swallowed.
    pub async fn record_best_effort(
        &self,
        entity_type: DocumentType,
        entity_id: Uuid,
        status: &str,
        note: Option<&str>,
        actor_id: Uuid,
    ) {
        if let Err(e) = self
            .record(entity_type, entity_id, status, note, actor_id)
            .await
        {
            tracing::warn!(
                "Failed to record history for {} {}: {}",
                entity_type.as_str(),
                entity_id,
                e
            );
        }
    }

    /// History entries for one entity, oldest first
    pub async fn entries_for(
        &self,
        entity_type: DocumentType,
        entity_id: Uuid,
    ) -> AppResult<Vec<CaseHistoryEntry>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT id, entity_type, entity_id, status, note, actor_id, created_at
            FROM case_histories
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(entity_type.as_str())
        .bind(entity_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

async fn insert_history<'e, E>(
    executor: E,
    entity_type: DocumentType,
    entity_id: Uuid,
    status: &str,
    note: Option<&str>,
    actor_id: Uuid,
) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO case_histories (entity_type, entity_id, status, note, actor_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(entity_type.as_str())
    .bind(entity_id)
    .bind(status)
    .bind(note)
    .bind(actor_id)
    .execute(executor)
    .await
    .map_err(AppError::DatabaseError)?;

    Ok(())
}
