//! Character persistence: the character roster, inventories, equipped
//! tools, and loans.
//!
//! Gold and gauge updates run as database-side arithmetic with clamps so
//! concurrent steps cannot push a gauge out of range.

use daybreak_types::{
    Character, CharacterId, EquippedTool, InventoryStack, ItemKind, Loan, LoanId, QualityTier,
    StackId, TownId,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::codec::{item_from_db, item_to_db, quality_from_db, quality_to_db, race_from_db, tool_from_db};
use crate::error::DbError;
use crate::pagination::{Page, after};

/// A stack draw to apply: remove `quantity` units from `stack_id`.
type Draw = (StackId, u32);

/// One gather's storage effects, applied atomically by
/// [`CharacterStore::settle_gather`].
#[derive(Debug, Clone, Copy)]
pub struct GatherSettlement {
    /// Who gathered.
    pub character: CharacterId,
    /// The town whose resource node was worked.
    pub town: TownId,
    /// The gathered material.
    pub item: ItemKind,
    /// Quality tier of the yield.
    pub quality: QualityTier,
    /// Units gathered; zero skips the inventory upsert.
    pub quantity: u32,
    /// Abundance taken off the node.
    pub depletion: u32,
    /// Tool durability left after the day's wear; `Some(0)` removes the
    /// tool, `None` leaves it untouched.
    pub tool_remaining: Option<u32>,
}

/// Operations on the `characters`, `inventory_stacks`, `equipped_tools`,
/// and `loans` tables.
pub struct CharacterStore<'a> {
    pool: &'a PgPool,
}

/// A raw row from `characters`.
#[derive(Debug, sqlx::FromRow)]
struct CharacterRow {
    id: Uuid,
    name: String,
    race: String,
    favored_profession: Option<String>,
    town_id: Uuid,
    gold: Decimal,
    satiety: i32,
    health: i32,
    might: i32,
    finesse: i32,
    wits: i32,
    reputation: i32,
    is_npc: bool,
}

impl CharacterRow {
    fn into_domain(self) -> Result<Character, DbError> {
        Ok(Character {
            id: CharacterId::from(self.id),
            name: self.name,
            race: race_from_db(&self.race)?,
            favored_profession: self
                .favored_profession
                .as_deref()
                .map(crate::codec::profession_from_db)
                .transpose()?,
            town_id: TownId::from(self.town_id),
            gold: self.gold,
            satiety: u32::try_from(self.satiety).unwrap_or(0),
            health: u32::try_from(self.health).unwrap_or(0),
            might: self.might,
            finesse: self.finesse,
            wits: self.wits,
            reputation: self.reputation,
            is_npc: self.is_npc,
        })
    }
}

const CHARACTER_COLUMNS: &str = r"id, name, race, favored_profession, town_id, gold,
    satiety, health, might, finesse, wits, reputation, is_npc";

impl<'a> CharacterStore<'a> {
    /// Create a new character store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one character.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] for an unknown id.
    pub async fn get(&self, id: CharacterId) -> Result<Character, DbError> {
        let row = sqlx::query_as::<_, CharacterRow>(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;
        row.map_or_else(
            || Err(DbError::NotFound(format!("character {id}"))),
            CharacterRow::into_domain,
        )
    }

    /// Fetch one page of the character roster, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch_page(
        &self,
        cursor: Option<Uuid>,
        limit: i64,
    ) -> Result<Page<Character>, DbError> {
        let rows = sqlx::query_as::<_, CharacterRow>(&format!(
            "SELECT {CHARACTER_COLUMNS} FROM characters WHERE id > $1 ORDER BY id LIMIT $2"
        ))
        .bind(after(cursor))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let last_id = rows.last().map(|r| r.id);
        let characters = rows
            .into_iter()
            .map(CharacterRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(characters, limit, last_id))
    }

    /// Insert a character (seed data and tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, character: &Character) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO characters
                  (id, name, race, favored_profession, town_id, gold,
                   satiety, health, might, finesse, wits, reputation, is_npc)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(character.id.into_inner())
        .bind(&character.name)
        .bind(crate::codec::race_to_db(character.race))
        .bind(character.favored_profession.map(crate::codec::profession_to_db))
        .bind(character.town_id.into_inner())
        .bind(character.gold)
        .bind(i32::try_from(character.satiety).unwrap_or(i32::MAX))
        .bind(i32::try_from(character.health).unwrap_or(i32::MAX))
        .bind(character.might)
        .bind(character.finesse)
        .bind(character.wits)
        .bind(character.reputation)
        .bind(character.is_npc)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Adjust a character's gold by a signed delta.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn adjust_gold(&self, id: CharacterId, delta: Decimal) -> Result<(), DbError> {
        sqlx::query(r"UPDATE characters SET gold = gold + $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(delta)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Relocate a character to another town.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_town(&self, id: CharacterId, town: TownId) -> Result<(), DbError> {
        sqlx::query(r"UPDATE characters SET town_id = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(town.into_inner())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Set a character's satiety gauge, clamped to [0, 100] in SQL.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_satiety(&self, id: CharacterId, satiety: u32) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE characters SET satiety = LEAST(GREATEST($2, 0), 100) WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(i32::try_from(satiety).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Set a character's health gauge, clamped to [0, 100] in SQL.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn set_health(&self, id: CharacterId, health: u32) -> Result<(), DbError> {
        sqlx::query(r"UPDATE characters SET health = LEAST(GREATEST($2, 0), 100) WHERE id = $1")
            .bind(id.into_inner())
            .bind(i32::try_from(health).unwrap_or(i32::MAX))
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Inventory
    // -------------------------------------------------------------------

    /// Fetch a character's full inventory, ordered by stack id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn inventory(&self, id: CharacterId) -> Result<Vec<InventoryStack>, DbError> {
        let rows: Vec<(Uuid, Uuid, String, String, i32)> = sqlx::query_as(
            r"SELECT id, character_id, item, quality, quantity
              FROM inventory_stacks
              WHERE character_id = $1
              ORDER BY id",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(stack_id, character_id, item, quality, quantity)| {
                Ok(InventoryStack {
                    id: StackId::from(stack_id),
                    character_id: CharacterId::from(character_id),
                    item: item_from_db(&item)?,
                    quality: quality_from_db(&quality)?,
                    quantity: u32::try_from(quantity).unwrap_or(0),
                })
            })
            .collect()
    }

    /// Add items to a character's inventory, merging into an existing
    /// stack of the same item and quality when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the upsert fails.
    pub async fn add_items(
        &self,
        id: CharacterId,
        item: ItemKind,
        quality: QualityTier,
        quantity: u32,
    ) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO inventory_stacks (id, character_id, item, quality, quantity)
              VALUES ($1, $2, $3, $4, $5)
              ON CONFLICT (character_id, item, quality) DO UPDATE
                  SET quantity = inventory_stacks.quantity + EXCLUDED.quantity",
        )
        .bind(StackId::new().into_inner())
        .bind(id.into_inner())
        .bind(item_to_db(item))
        .bind(quality_to_db(quality))
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Settle one gather in a single transaction: upsert the yield into
    /// inventory, deplete the town's resource node, and apply tool wear.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails; nothing is
    /// applied in that case.
    pub async fn settle_gather(&self, settlement: &GatherSettlement) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        if settlement.quantity > 0 {
            sqlx::query(
                r"INSERT INTO inventory_stacks (id, character_id, item, quality, quantity)
                  VALUES ($1, $2, $3, $4, $5)
                  ON CONFLICT (character_id, item, quality) DO UPDATE
                      SET quantity = inventory_stacks.quantity + EXCLUDED.quantity",
            )
            .bind(StackId::new().into_inner())
            .bind(settlement.character.into_inner())
            .bind(item_to_db(settlement.item))
            .bind(quality_to_db(settlement.quality))
            .bind(i32::try_from(settlement.quantity).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"UPDATE town_resources
              SET abundance = GREATEST(abundance - $3, 0)
              WHERE town_id = $1 AND item = $2",
        )
        .bind(settlement.town.into_inner())
        .bind(item_to_db(settlement.item))
        .bind(i32::try_from(settlement.depletion).unwrap_or(i32::MAX))
        .execute(&mut *tx)
        .await?;

        match settlement.tool_remaining {
            Some(0) => {
                sqlx::query(r"DELETE FROM equipped_tools WHERE character_id = $1")
                    .bind(settlement.character.into_inner())
                    .execute(&mut *tx)
                    .await?;
            }
            Some(remaining) => {
                sqlx::query(r"UPDATE equipped_tools SET durability = $2 WHERE character_id = $1")
                    .bind(settlement.character.into_inner())
                    .bind(i32::try_from(remaining).unwrap_or(i32::MAX))
                    .execute(&mut *tx)
                    .await?;
            }
            None => {}
        }

        tx.commit().await?;
        Ok(())
    }

    /// Apply a craft's ingredient draws and create its output in one
    /// transaction: consume and create are atomic.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails; nothing is
    /// applied in that case.
    pub async fn consume_and_create(
        &self,
        id: CharacterId,
        draws: &[Draw],
        output: ItemKind,
        quality: QualityTier,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for &(stack_id, quantity) in draws {
            sqlx::query(
                r"UPDATE inventory_stacks
                  SET quantity = GREATEST(quantity - $2, 0)
                  WHERE id = $1",
            )
            .bind(stack_id.into_inner())
            .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }
        sqlx::query(r"DELETE FROM inventory_stacks WHERE character_id = $1 AND quantity <= 0")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"INSERT INTO inventory_stacks (id, character_id, item, quality, quantity)
              VALUES ($1, $2, $3, $4, 1)
              ON CONFLICT (character_id, item, quality) DO UPDATE
                  SET quantity = inventory_stacks.quantity + 1",
        )
        .bind(StackId::new().into_inner())
        .bind(id.into_inner())
        .bind(item_to_db(output))
        .bind(quality_to_db(quality))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove items from one stack, deleting it when emptied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn remove_from_stack(&self, stack: StackId, quantity: u32) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE inventory_stacks SET quantity = GREATEST(quantity - $2, 0) WHERE id = $1",
        )
        .bind(stack.into_inner())
        .bind(i32::try_from(quantity).unwrap_or(i32::MAX))
        .execute(self.pool)
        .await?;
        sqlx::query(r"DELETE FROM inventory_stacks WHERE id = $1 AND quantity <= 0")
            .bind(stack.into_inner())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Tools
    // -------------------------------------------------------------------

    /// Fetch the character's equipped tool, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn equipped_tool(&self, id: CharacterId) -> Result<Option<EquippedTool>, DbError> {
        let row: Option<(Uuid, String, i32, i32)> = sqlx::query_as(
            r"SELECT character_id, kind, bonus_pct, durability
              FROM equipped_tools WHERE character_id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        row.map(|(character_id, kind, bonus_pct, durability)| {
            Ok(EquippedTool {
                character_id: CharacterId::from(character_id),
                kind: tool_from_db(&kind)?,
                bonus_pct: u32::try_from(bonus_pct).unwrap_or(0),
                durability: u32::try_from(durability).unwrap_or(0),
            })
        })
        .transpose()
    }

    /// Apply one work action's tool wear: decrement durability, removing
    /// the row entirely when the tool breaks.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn apply_tool_wear(&self, id: CharacterId, remaining: u32) -> Result<(), DbError> {
        if remaining == 0 {
            sqlx::query(r"DELETE FROM equipped_tools WHERE character_id = $1")
                .bind(id.into_inner())
                .execute(self.pool)
                .await?;
        } else {
            sqlx::query(r"UPDATE equipped_tools SET durability = $2 WHERE character_id = $1")
                .bind(id.into_inner())
                .bind(i32::try_from(remaining).unwrap_or(i32::MAX))
                .execute(self.pool)
                .await?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Reputation and loans
    // -------------------------------------------------------------------

    /// Decay every character's reputation one step toward zero.
    ///
    /// Returns the number of characters whose reputation moved.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn decay_reputation(&self, step: u32) -> Result<u64, DbError> {
        let step = i32::try_from(step).unwrap_or(i32::MAX);
        let result = sqlx::query(
            r"UPDATE characters
              SET reputation = CASE
                  WHEN reputation > 0 THEN GREATEST(reputation - $1, 0)
                  WHEN reputation < 0 THEN LEAST(reputation + $1, 0)
                  ELSE 0
              END
              WHERE reputation <> 0",
        )
        .bind(step)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Apply a signed reputation delta to one character.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn adjust_reputation(&self, id: CharacterId, delta: i32) -> Result<(), DbError> {
        sqlx::query(r"UPDATE characters SET reputation = reputation + $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(delta)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Loans due on or before the given day that are not yet defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn due_loans(&self, day: chrono::NaiveDate) -> Result<Vec<Loan>, DbError> {
        let rows: Vec<(Uuid, Uuid, Uuid, Decimal, chrono::NaiveDate, bool)> = sqlx::query_as(
            r"SELECT id, debtor, creditor, principal, due_on, defaulted
              FROM loans
              WHERE due_on <= $1 AND NOT defaulted
              ORDER BY id",
        )
        .bind(day)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, debtor, creditor, principal, due_on, defaulted)| Loan {
                id: LoanId::from(id),
                debtor: CharacterId::from(debtor),
                creditor: CharacterId::from(creditor),
                principal,
                due_on,
                defaulted,
            })
            .collect())
    }

    /// Mark a loan defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn mark_defaulted(&self, id: LoanId) -> Result<(), DbError> {
        sqlx::query(r"UPDATE loans SET defaulted = TRUE WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Settle a loan: move the principal from debtor to creditor and
    /// delete the row, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if any statement fails.
    pub async fn settle_loan(&self, loan: &Loan) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(r"UPDATE characters SET gold = gold - $2 WHERE id = $1")
            .bind(loan.debtor.into_inner())
            .bind(loan.principal)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r"UPDATE characters SET gold = gold + $2 WHERE id = $1")
            .bind(loan.creditor.into_inner())
            .bind(loan.principal)
            .execute(&mut *tx)
            .await?;
        sqlx::query(r"DELETE FROM loans WHERE id = $1")
            .bind(loan.id.into_inner())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
