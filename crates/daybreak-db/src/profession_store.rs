//! Profession persistence and the atomic XP award.
//!
//! Profession rows are created lazily on first use. The XP award locks
//! the row, rolls the level forward through `daybreak-rules`, and writes
//! level, XP, and tier back in one transaction so the denormalized tier
//! can never drift from the level.

use daybreak_rules::progression::{self, Progress};
use daybreak_types::{CharacterId, PlayerProfession, ProfessionKind};
use sqlx::PgPool;
use uuid::Uuid;

use crate::codec::{profession_from_db, profession_to_db, tier_from_db, tier_to_db};
use crate::error::DbError;
use crate::pagination::{Page, after};

/// Operations on the `player_professions` table.
pub struct ProfessionStore<'a> {
    pool: &'a PgPool,
}

fn row_to_domain(
    (character_id, kind, tier, level, xp, active): (Uuid, String, String, i32, i32, bool),
) -> Result<PlayerProfession, DbError> {
    Ok(PlayerProfession {
        character_id: CharacterId::from(character_id),
        kind: profession_from_db(&kind)?,
        tier: tier_from_db(&tier)?,
        level: u32::try_from(level).unwrap_or(1),
        xp: u32::try_from(xp).unwrap_or(0),
        active,
    })
}

impl<'a> ProfessionStore<'a> {
    /// Create a new profession store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one character's standing in one profession, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(
        &self,
        character: CharacterId,
        kind: ProfessionKind,
    ) -> Result<Option<PlayerProfession>, DbError> {
        let row: Option<(Uuid, String, String, i32, i32, bool)> = sqlx::query_as(
            r"SELECT character_id, kind, tier, level, xp, active
              FROM player_professions
              WHERE character_id = $1 AND kind = $2",
        )
        .bind(character.into_inner())
        .bind(profession_to_db(kind))
        .fetch_optional(self.pool)
        .await?;
        row.map(row_to_domain).transpose()
    }

    /// Award XP atomically: lock the row (creating it at level 1 when
    /// missing), roll level-ups forward, persist level/XP/tier.
    ///
    /// Returns the resulting progress so callers can report level-ups.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Rules`] if the XP accumulation overflows and
    /// [`DbError::Postgres`] if any statement fails.
    pub async fn award_xp(
        &self,
        character: CharacterId,
        kind: ProfessionKind,
        amount: u32,
    ) -> Result<Progress, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"INSERT INTO player_professions (character_id, kind, tier, level, xp, active)
              VALUES ($1, $2, 'apprentice', 1, 0, TRUE)
              ON CONFLICT (character_id, kind) DO NOTHING",
        )
        .bind(character.into_inner())
        .bind(profession_to_db(kind))
        .execute(&mut *tx)
        .await?;

        let (level, xp): (i32, i32) = sqlx::query_as(
            r"SELECT level, xp FROM player_professions
              WHERE character_id = $1 AND kind = $2
              FOR UPDATE",
        )
        .bind(character.into_inner())
        .bind(profession_to_db(kind))
        .fetch_one(&mut *tx)
        .await?;

        let progress = progression::apply_xp(
            u32::try_from(level).unwrap_or(1),
            u32::try_from(xp).unwrap_or(0),
            amount,
        )?;

        sqlx::query(
            r"UPDATE player_professions
              SET level = $3, xp = $4, tier = $5
              WHERE character_id = $1 AND kind = $2",
        )
        .bind(character.into_inner())
        .bind(profession_to_db(kind))
        .bind(i32::try_from(progress.level).unwrap_or(i32::MAX))
        .bind(i32::try_from(progress.xp).unwrap_or(i32::MAX))
        .bind(tier_to_db(progress.tier))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if progress.levels_gained > 0 {
            tracing::debug!(
                character = %character,
                profession = ?kind,
                level = progress.level,
                gained = progress.levels_gained,
                "Profession leveled up"
            );
        }
        Ok(progress)
    }

    /// One page of active service professions (innkeepers and healers),
    /// ordered by character id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn service_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Page<PlayerProfession>, DbError> {
        let rows: Vec<(Uuid, String, String, i32, i32, bool)> = sqlx::query_as(
            r"SELECT character_id, kind, tier, level, xp, active
              FROM player_professions
              WHERE active AND kind IN ('innkeeper', 'healer') AND character_id > $1
              ORDER BY character_id
              LIMIT $2",
        )
        .bind(after(cursor))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let last_id = rows.last().map(|r| r.0);
        let professions = rows
            .into_iter()
            .map(row_to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(professions, limit, last_id))
    }
}
