//! The action ledger: one committed action per character per game day.
//!
//! Submission upserts on (character, day) so re-submitting before the
//! tick replaces the earlier choice. Resolution reads are keyset
//! paginated by (day, action type) and rows become immutable history
//! once marked resolved.

use chrono::NaiveDate;
use daybreak_rules::hunger;
use daybreak_types::{ActionId, ActionStatus, ActionType, CharacterId, DailyAction};
use sqlx::PgPool;
use uuid::Uuid;

use crate::codec::{
    action_status_from_db, action_status_to_db, action_type_from_db, action_type_to_db,
    race_from_db,
};
use crate::error::DbError;
use crate::pagination::{Page, after};

/// Operations on the `daily_actions` table.
pub struct ActionStore<'a> {
    pool: &'a PgPool,
}

/// A raw row from `daily_actions`.
#[derive(Debug, sqlx::FromRow)]
struct ActionRow {
    id: Uuid,
    character_id: Uuid,
    day: NaiveDate,
    action_type: String,
    params: serde_json::Value,
    combat: Option<serde_json::Value>,
    status: String,
    submitted_at: chrono::DateTime<chrono::Utc>,
}

impl ActionRow {
    fn into_domain(self) -> Result<DailyAction, DbError> {
        Ok(DailyAction {
            id: ActionId::from(self.id),
            character_id: CharacterId::from(self.character_id),
            day: self.day,
            action_type: action_type_from_db(&self.action_type)?,
            params: serde_json::from_value(self.params)?,
            combat: self.combat.map(serde_json::from_value).transpose()?,
            status: action_status_from_db(&self.status)?,
            submitted_at: self.submitted_at,
        })
    }
}

impl<'a> ActionStore<'a> {
    /// Create a new action store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Lock in (or replace) a character's action for one day.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Incapacitated`] when the character's hunger
    /// state forbids the submission (REST is always allowed), and
    /// [`DbError::NotFound`] for an unknown character.
    pub async fn submit(&self, action: &DailyAction) -> Result<(), DbError> {
        let row: Option<(String, i32)> =
            sqlx::query_as(r"SELECT race, satiety FROM characters WHERE id = $1")
                .bind(action.character_id.into_inner())
                .fetch_optional(self.pool)
                .await?;
        let Some((race, satiety)) = row else {
            return Err(DbError::NotFound(format!(
                "character {}",
                action.character_id
            )));
        };

        let race = race_from_db(&race)?;
        let satiety = u32::try_from(satiety).unwrap_or(0);
        let state = hunger::hunger_for(race, satiety);
        if !hunger::may_submit(state, action.action_type) {
            return Err(DbError::Incapacitated {
                character: action.character_id,
            });
        }

        sqlx::query(
            r"INSERT INTO daily_actions
                  (id, character_id, day, action_type, params, combat, status, submitted_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
              ON CONFLICT (character_id, day) DO UPDATE
                  SET action_type = EXCLUDED.action_type,
                      params = EXCLUDED.params,
                      combat = EXCLUDED.combat,
                      status = EXCLUDED.status,
                      submitted_at = EXCLUDED.submitted_at",
        )
        .bind(action.id.into_inner())
        .bind(action.character_id.into_inner())
        .bind(action.day)
        .bind(action_type_to_db(action.action_type))
        .bind(serde_json::to_value(&action.params)?)
        .bind(action.combat.map(serde_json::to_value).transpose()?)
        .bind(action_status_to_db(ActionStatus::LockedIn))
        .bind(action.submitted_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Fetch one page of locked-in actions of one type for one day.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_page(
        &self,
        day: NaiveDate,
        action_type: ActionType,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Page<DailyAction>, DbError> {
        let rows = sqlx::query_as::<_, ActionRow>(
            r"SELECT id, character_id, day, action_type, params, combat, status, submitted_at
              FROM daily_actions
              WHERE day = $1 AND action_type = $2 AND status = 'locked_in' AND id > $3
              ORDER BY id
              LIMIT $4",
        )
        .bind(day)
        .bind(action_type_to_db(action_type))
        .bind(after(cursor))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let last_id = rows.last().map(|r| r.id);
        let actions = rows
            .into_iter()
            .map(ActionRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(actions, limit, last_id))
    }

    /// Character ids that locked in any action for the day, paged.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn acting_characters_page(
        &self,
        day: NaiveDate,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Page<(ActionId, CharacterId)>, DbError> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r"SELECT id, character_id FROM daily_actions
              WHERE day = $1 AND id > $2
              ORDER BY id
              LIMIT $3",
        )
        .bind(day)
        .bind(after(cursor))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let last_id = rows.last().map(|&(id, _)| id);
        let items = rows
            .into_iter()
            .map(|(id, character)| (ActionId::from(id), CharacterId::from(character)))
            .collect();
        Ok(Page::new(items, limit, last_id))
    }

    /// Mark a batch of actions resolved (completed or failed).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn mark_resolved(
        &self,
        resolutions: &[(ActionId, ActionStatus)],
    ) -> Result<(), DbError> {
        if resolutions.is_empty() {
            return Ok(());
        }

        let mut ids = Vec::with_capacity(resolutions.len());
        let mut statuses = Vec::with_capacity(resolutions.len());
        for &(id, status) in resolutions {
            ids.push(id.into_inner());
            statuses.push(action_status_to_db(status).to_owned());
        }

        sqlx::query(
            r"UPDATE daily_actions AS a
              SET status = u.status
              FROM UNNEST($1::UUID[], $2::TEXT[]) AS u(id, status)
              WHERE a.id = u.id AND a.status = 'locked_in'",
        )
        .bind(&ids)
        .bind(&statuses)
        .execute(self.pool)
        .await?;

        tracing::debug!(count = resolutions.len(), "Marked actions resolved");
        Ok(())
    }

    /// Per-type counts of actions locked in for one day.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn counts_for_day(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<(ActionType, u32)>, DbError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r"SELECT action_type, COUNT(*) FROM daily_actions
              WHERE day = $1
              GROUP BY action_type",
        )
        .bind(day)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(kind, count)| {
                Ok((
                    action_type_from_db(&kind)?,
                    u32::try_from(count).unwrap_or(u32::MAX),
                ))
            })
            .collect()
    }
}
