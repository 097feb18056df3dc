//! Daily report and tick summary persistence.
//!
//! Reports are flushed at the end of each tick in batches and upserted
//! on (character, day), so re-running results delivery for a day is
//! idempotent.

use chrono::NaiveDate;
use daybreak_types::{CharacterId, CharacterResults, DailyReport, TickSummary};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Default batch size for report upserts.
const DEFAULT_BATCH_SIZE: usize = 100;

/// Operations on the `daily_reports` and `tick_summaries` tables.
pub struct ReportStore<'a> {
    pool: &'a PgPool,
    batch_size: usize,
}

impl<'a> ReportStore<'a> {
    /// Create a new report store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the batch size for upserts.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Batch-upsert daily reports keyed by (character, day).
    ///
    /// Each batch is a single multi-row UNNEST insert inside a
    /// transaction; conflicting rows are overwritten with the fresher
    /// results so the flush is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if an insert fails and
    /// [`DbError::Serialization`] if a results payload fails to encode.
    pub async fn upsert_reports(&self, reports: &[DailyReport]) -> Result<(), DbError> {
        if reports.is_empty() {
            return Ok(());
        }

        for chunk in reports.chunks(self.batch_size) {
            let mut tx = self.pool.begin().await?;

            let len = chunk.len();
            let mut character_ids = Vec::with_capacity(len);
            let mut days = Vec::with_capacity(len);
            let mut payloads = Vec::with_capacity(len);
            for report in chunk {
                character_ids.push(report.character_id.into_inner());
                days.push(report.day);
                payloads.push(serde_json::to_value(&report.results)?);
            }

            sqlx::query(
                r"INSERT INTO daily_reports (character_id, day, results)
                  SELECT * FROM UNNEST($1::UUID[], $2::DATE[], $3::JSONB[])
                  ON CONFLICT (character_id, day) DO UPDATE
                      SET results = EXCLUDED.results",
            )
            .bind(&character_ids)
            .bind(&days)
            .bind(&payloads)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
        }

        tracing::debug!(count = reports.len(), "Upserted daily reports (batch UNNEST)");
        Ok(())
    }

    /// Fetch one character's report for one day, if delivered.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_report(
        &self,
        character: CharacterId,
        day: NaiveDate,
    ) -> Result<Option<DailyReport>, DbError> {
        let row: Option<(Uuid, NaiveDate, serde_json::Value)> = sqlx::query_as(
            r"SELECT character_id, day, results
              FROM daily_reports
              WHERE character_id = $1 AND day = $2",
        )
        .bind(character.into_inner())
        .bind(day)
        .fetch_optional(self.pool)
        .await?;

        row.map(|(character_id, day, results)| {
            let results: CharacterResults = serde_json::from_value(results)?;
            Ok(DailyReport {
                character_id: CharacterId::from(character_id),
                day,
                results,
            })
        })
        .transpose()
    }

    /// Persist one tick's operational summary.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert_summary(&self, summary: &TickSummary) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO tick_summaries (day, characters_processed, action_counts, duration_ms, errors)
              VALUES ($1, $2, $3, $4, $5)
              ON CONFLICT (day) DO UPDATE
                  SET characters_processed = EXCLUDED.characters_processed,
                      action_counts = EXCLUDED.action_counts,
                      duration_ms = EXCLUDED.duration_ms,
                      errors = EXCLUDED.errors",
        )
        .bind(summary.day)
        .bind(i64::from(summary.characters_processed))
        .bind(serde_json::to_value(&summary.action_counts)?)
        .bind(i64::try_from(summary.duration_ms).unwrap_or(i64::MAX))
        .bind(&summary.errors)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}
