//! World persistence: towns, resource nodes, buildings, treasuries,
//! trade volume, and caravans.
//!
//! Gauge updates (abundance, condition) run as clamped database-side
//! arithmetic so concurrent writers in one tick cannot push a gauge out
//! of its range.

use chrono::{DateTime, NaiveDate, Utc};
use daybreak_types::{
    Building, BuildingId, Caravan, CaravanId, CharacterId, ItemKind, Kingdom, KingdomId, Town,
    TownId, TownResource,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::codec::{biome_from_db, building_from_db, item_from_db, item_to_db};
use crate::error::DbError;
use crate::pagination::{Page, after};

/// Operations on the world tables.
pub struct WorldStore<'a> {
    pool: &'a PgPool,
}

/// A raw row from `buildings`.
#[derive(Debug, sqlx::FromRow)]
struct BuildingRow {
    id: Uuid,
    town_id: Uuid,
    owner: Option<Uuid>,
    kind: String,
    level: i32,
    condition: i32,
    delinquent_since: Option<NaiveDate>,
    delinquent_days: i32,
}

impl BuildingRow {
    fn into_domain(self) -> Result<Building, DbError> {
        Ok(Building {
            id: BuildingId::from(self.id),
            town_id: TownId::from(self.town_id),
            owner: self.owner.map(CharacterId::from),
            kind: building_from_db(&self.kind)?,
            level: u32::try_from(self.level).unwrap_or(1),
            condition: u32::try_from(self.condition).unwrap_or(0),
            delinquent_since: self.delinquent_since,
            delinquent_days: u32::try_from(self.delinquent_days).unwrap_or(0),
        })
    }
}

impl<'a> WorldStore<'a> {
    /// Create a new world store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // -------------------------------------------------------------------
    // Towns and kingdoms
    // -------------------------------------------------------------------

    /// Fetch all towns. The world holds tens of towns, not thousands;
    /// this read is not paginated.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn towns(&self) -> Result<Vec<Town>, DbError> {
        let rows: Vec<(
            Uuid,
            String,
            Uuid,
            String,
            Option<Uuid>,
            i32,
            Decimal,
            DateTime<Utc>,
        )> = sqlx::query_as(
            r"SELECT id, name, kingdom_id, biome, mayor, tax_rate_pct, treasury, trade_tax_watermark
              FROM towns ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(
                |(id, name, kingdom_id, biome, mayor, tax_rate_pct, treasury, watermark)| {
                    Ok(Town {
                        id: TownId::from(id),
                        name,
                        kingdom_id: KingdomId::from(kingdom_id),
                        biome: biome_from_db(&biome)?,
                        mayor: mayor.map(CharacterId::from),
                        tax_rate_pct: u32::try_from(tax_rate_pct).unwrap_or(0),
                        treasury,
                        trade_tax_watermark: watermark,
                    })
                },
            )
            .collect()
    }

    /// Fetch all kingdoms.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn kingdoms(&self) -> Result<Vec<Kingdom>, DbError> {
        let rows: Vec<(Uuid, String, Option<Uuid>)> =
            sqlx::query_as(r"SELECT id, name, ruler FROM kingdoms ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, ruler)| Kingdom {
                id: KingdomId::from(id),
                name,
                ruler: ruler.map(CharacterId::from),
            })
            .collect())
    }

    /// Install a town's mayor.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_mayor(
        &self,
        town: TownId,
        mayor: Option<CharacterId>,
    ) -> Result<(), DbError> {
        sqlx::query(r"UPDATE towns SET mayor = $2 WHERE id = $1")
            .bind(town.into_inner())
            .bind(mayor.map(CharacterId::into_inner))
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Install a kingdom's ruler.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_ruler(
        &self,
        kingdom: KingdomId,
        ruler: Option<CharacterId>,
    ) -> Result<(), DbError> {
        sqlx::query(r"UPDATE kingdoms SET ruler = $2 WHERE id = $1")
            .bind(kingdom.into_inner())
            .bind(ruler.map(CharacterId::into_inner))
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Resource nodes
    // -------------------------------------------------------------------

    /// Fetch one town's resource row for one item, if present.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn resource(
        &self,
        town: TownId,
        item: ItemKind,
    ) -> Result<Option<TownResource>, DbError> {
        let row: Option<(Uuid, String, i32, Decimal)> = sqlx::query_as(
            r"SELECT town_id, item, abundance, respawn_rate
              FROM town_resources
              WHERE town_id = $1 AND item = $2",
        )
        .bind(town.into_inner())
        .bind(item_to_db(item))
        .fetch_optional(self.pool)
        .await?;

        row.map(|(town_id, item, abundance, respawn_rate)| {
            Ok(TownResource {
                town_id: TownId::from(town_id),
                item: item_from_db(&item)?,
                abundance: u32::try_from(abundance).unwrap_or(0),
                respawn_rate,
            })
        })
        .transpose()
    }

    /// Deplete a resource node, clamped at zero in SQL so concurrent
    /// gathers cannot race below it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn deplete_resource(
        &self,
        town: TownId,
        item: ItemKind,
        amount: u32,
    ) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE town_resources
              SET abundance = GREATEST(abundance - $3, 0)
              WHERE town_id = $1 AND item = $2",
        )
        .bind(town.into_inner())
        .bind(item_to_db(item))
        .bind(i32::try_from(amount).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Regenerate every resource node by `max(1, round(respawn_rate))`,
    /// capped at 100, in one statement.
    ///
    /// Returns the number of nodes touched.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn regenerate_resources(&self) -> Result<u64, DbError> {
        let result = sqlx::query(
            r"UPDATE town_resources
              SET abundance = LEAST(abundance + GREATEST(ROUND(respawn_rate)::INT, 1), 100)
              WHERE abundance < 100",
        )
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // -------------------------------------------------------------------
    // Buildings
    // -------------------------------------------------------------------

    /// One page of all buildings, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn buildings_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Page<Building>, DbError> {
        let rows = sqlx::query_as::<_, BuildingRow>(
            r"SELECT id, town_id, owner, kind, level, condition, delinquent_since, delinquent_days
              FROM buildings
              WHERE id > $1
              ORDER BY id
              LIMIT $2",
        )
        .bind(after(cursor))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let last_id = rows.last().map(|r| r.id);
        let buildings = rows
            .into_iter()
            .map(BuildingRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(buildings, limit, last_id))
    }

    /// The best in-town workshop for a profession: the highest-level
    /// building whose kind hosts it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn best_workshop(
        &self,
        town: TownId,
        kinds: &[&str],
    ) -> Result<Option<Building>, DbError> {
        let kinds: Vec<String> = kinds.iter().map(|&k| k.to_owned()).collect();
        let row = sqlx::query_as::<_, BuildingRow>(
            r"SELECT id, town_id, owner, kind, level, condition, delinquent_since, delinquent_days
              FROM buildings
              WHERE town_id = $1 AND kind = ANY($2)
              ORDER BY level DESC, id
              LIMIT 1",
        )
        .bind(town.into_inner())
        .bind(&kinds)
        .fetch_optional(self.pool)
        .await?;
        row.map(BuildingRow::into_domain).transpose()
    }

    /// Set a building's condition gauge, clamped to [0, 100] in SQL.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_condition(&self, id: BuildingId, condition: u32) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE buildings SET condition = LEAST(GREATEST($2, 0), 100) WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(i32::try_from(condition).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Record a paid property tax: debit the owner, credit the town
    /// treasury, clear the delinquency streak, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails.
    pub async fn record_tax_paid(
        &self,
        building: BuildingId,
        owner: CharacterId,
        town: TownId,
        amount: Decimal,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(r"UPDATE characters SET gold = gold - $2 WHERE id = $1")
            .bind(owner.into_inner())
            .bind(amount)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r"UPDATE towns SET treasury = treasury + $2 WHERE id = $1")
            .bind(town.into_inner())
            .bind(amount)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r"UPDATE buildings SET delinquent_since = NULL, delinquent_days = 0 WHERE id = $1",
        )
        .bind(building.into_inner())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Record a missed property tax: bump the delinquency streak.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn record_delinquency(
        &self,
        building: BuildingId,
        since: NaiveDate,
        days: u32,
    ) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE buildings SET delinquent_since = $2, delinquent_days = $3 WHERE id = $1",
        )
        .bind(building.into_inner())
        .bind(since)
        .bind(i32::try_from(days).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Transfer a seized building to a new owner and clear its arrears.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn seize_building(
        &self,
        building: BuildingId,
        new_owner: CharacterId,
    ) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE buildings
              SET owner = $2, delinquent_since = NULL, delinquent_days = 0
              WHERE id = $1",
        )
        .bind(building.into_inner())
        .bind(new_owner.into_inner())
        .execute(self.pool)
        .await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Treasuries and trade volume
    // -------------------------------------------------------------------

    /// Credit a town treasury.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn credit_treasury(&self, town: TownId, amount: Decimal) -> Result<(), DbError> {
        sqlx::query(r"UPDATE towns SET treasury = treasury + $2 WHERE id = $1")
            .bind(town.into_inner())
            .bind(amount)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Total untaxed trade volume in a town since its watermark, along
    /// with the newest trade time (the new watermark).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn untaxed_trade_volume(
        &self,
        town: TownId,
        watermark: DateTime<Utc>,
    ) -> Result<Option<(Decimal, DateTime<Utc>)>, DbError> {
        let row: Option<(Decimal, DateTime<Utc>)> = sqlx::query_as(
            r"SELECT SUM(volume), MAX(executed_at)
              FROM trades
              WHERE town_id = $1 AND executed_at > $2
              HAVING COUNT(*) > 0",
        )
        .bind(town.into_inner())
        .bind(watermark)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Advance a town's trade-tax watermark.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn advance_watermark(
        &self,
        town: TownId,
        to: DateTime<Utc>,
    ) -> Result<(), DbError> {
        sqlx::query(r"UPDATE towns SET trade_tax_watermark = $2 WHERE id = $1")
            .bind(town.into_inner())
            .bind(to)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Caravans
    // -------------------------------------------------------------------

    /// Caravans that have arrived but whose owners were not yet notified.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn arrived_caravans(&self, now: DateTime<Utc>) -> Result<Vec<Caravan>, DbError> {
        let rows: Vec<(Uuid, Uuid, Uuid, DateTime<Utc>, bool)> = sqlx::query_as(
            r"SELECT id, owner, destination, arrives_at, notified
              FROM caravans
              WHERE arrives_at <= $1 AND NOT notified
              ORDER BY id",
        )
        .bind(now)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, owner, destination, arrives_at, notified)| Caravan {
                id: CaravanId::from(id),
                owner: CharacterId::from(owner),
                destination: TownId::from(destination),
                arrives_at,
                notified,
            })
            .collect())
    }

    /// Mark a caravan's arrival notification as delivered.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn mark_caravan_notified(&self, id: CaravanId) -> Result<(), DbError> {
        sqlx::query(r"UPDATE caravans SET notified = TRUE WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
