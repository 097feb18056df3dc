//! Core entity structs for the Daybreak tick engine.
//!
//! These are the typed shapes of the persisted rows the data layer reads
//! and writes. World-state bags that the original storage packed into
//! free-form JSON columns (building condition, delinquency) are modeled
//! here as explicit optional fields validated at the storage boundary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    Biome, BuildingKind, ElectionPhase, ImpeachmentStatus, ItemKind, LawStatus, ProfessionKind,
    ProfessionTier, QualityTier, Race, ToolKind,
};
use crate::ids::{
    BuildingId, CaravanId, CharacterId, ElectionId, ImpeachmentId, KingdomId, LawId, LoanId,
    StackId, TownId,
};

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// A player character as the tick engine sees it.
///
/// The satiety gauge (0-100) is the raw input to the hunger ladder; the
/// per-tick hunger state itself is computed in step 1 of the pipeline and
/// cached, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Character {
    /// The character's unique identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// The character's race.
    pub race: Race,
    /// Half-breeds choose one favored profession at creation; the racial
    /// table re-applies a fixed bonus wherever it matches.
    pub favored_profession: Option<ProfessionKind>,
    /// The town the character currently occupies.
    pub town_id: TownId,
    /// Liquid gold.
    #[ts(as = "String")]
    pub gold: Decimal,
    /// Satiety gauge, 0 (starved) to 100 (feasted).
    pub satiety: u32,
    /// Current health, 0-100.
    pub health: u32,
    /// Might attribute modifier (mining, felling).
    pub might: i32,
    /// Finesse attribute modifier (fishing, tailoring).
    pub finesse: i32,
    /// Wits attribute modifier (herbalism, alchemy).
    pub wits: i32,
    /// Standing with the town, decays toward zero each tick.
    pub reputation: i32,
    /// Whether this is an NPC (service income goes to the town treasury).
    pub is_npc: bool,
}

impl Character {
    /// The attribute modifier a profession keys off.
    pub const fn stat_modifier(&self, profession: ProfessionKind) -> i32 {
        match profession {
            ProfessionKind::Miner | ProfessionKind::Lumberjack | ProfessionKind::Blacksmith => {
                self.might
            }
            ProfessionKind::Fisher | ProfessionKind::Tailor | ProfessionKind::Carpenter => {
                self.finesse
            }
            ProfessionKind::Herbalist
            | ProfessionKind::Alchemist
            | ProfessionKind::Innkeeper
            | ProfessionKind::Healer => self.wits,
        }
    }
}

/// A character's standing in one profession.
///
/// Created lazily on first gather/craft of that profession. `tier` is
/// denormalized for querying but is always recomputed from `level` by
/// the XP award, so the two can never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerProfession {
    /// The owning character.
    pub character_id: CharacterId,
    /// The profession.
    pub kind: ProfessionKind,
    /// Proficiency band, a pure function of `level`.
    pub tier: ProfessionTier,
    /// Level, 1-100.
    pub level: u32,
    /// XP accumulated within the current level. Never negative.
    pub xp: u32,
    /// Whether the character currently practices this profession.
    pub active: bool,
}

/// One stack of identical items in a character's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryStack {
    /// Stack identifier; consumption order sorts on this (v7, so oldest first).
    pub id: StackId,
    /// The owning character.
    pub character_id: CharacterId,
    /// What the stack holds.
    pub item: ItemKind,
    /// Craft quality of the stack contents.
    pub quality: QualityTier,
    /// How many items the stack holds.
    pub quantity: u32,
}

/// The tool a character has equipped, if any.
///
/// Durability drops by one per work action; at zero the tool breaks and
/// is unequipped, and the character receives a tool-broken event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EquippedTool {
    /// The owning character.
    pub character_id: CharacterId,
    /// The tool kind.
    pub kind: ToolKind,
    /// Additive bonus the tool grants to work rolls, in percent.
    pub bonus_pct: u32,
    /// Uses remaining before the tool breaks.
    pub durability: u32,
}

/// A loan between characters, swept for defaults each tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Loan {
    /// The loan's identifier.
    pub id: LoanId,
    /// Who owes the money.
    pub debtor: CharacterId,
    /// Who is owed.
    pub creditor: CharacterId,
    /// Outstanding amount.
    #[ts(as = "String")]
    pub principal: Decimal,
    /// The day repayment falls due.
    pub due_on: NaiveDate,
    /// Set once the default sweep has marked the loan.
    pub defaulted: bool,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// A town: the shared locus of resources, buildings, and local governance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Town {
    /// The town's identifier.
    pub id: TownId,
    /// Display name.
    pub name: String,
    /// The kingdom the town belongs to.
    pub kingdom_id: KingdomId,
    /// Dominant biome, used by conditional racial penalties.
    pub biome: Biome,
    /// The sitting mayor, if any.
    pub mayor: Option<CharacterId>,
    /// Property-tax rate as a percentage added to the base (e.g. 10 = +10%).
    pub tax_rate_pct: u32,
    /// Treasury balance.
    #[ts(as = "String")]
    pub treasury: Decimal,
    /// Trades up to this moment have already been taxed.
    pub trade_tax_watermark: DateTime<Utc>,
}

/// A kingdom: a crown seat over several towns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Kingdom {
    /// The kingdom's identifier.
    pub id: KingdomId,
    /// Display name.
    pub name: String,
    /// The sitting ruler, if any.
    pub ruler: Option<CharacterId>,
}

/// Per-(town, resource) abundance row, shared by every character
/// gathering that resource in that town.
///
/// Invariant: `abundance` stays in [0, 100]. Depletion and regeneration
/// are applied with clamped read-modify-write statements at the storage
/// layer so concurrent gathers in one tick cannot race below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TownResource {
    /// The town.
    pub town_id: TownId,
    /// The raw material this row gauges.
    pub item: ItemKind,
    /// How much remains harvestable, 0-100.
    pub abundance: u32,
    /// Daily regeneration; applied as `max(1, round(respawn_rate))`.
    #[ts(as = "String")]
    pub respawn_rate: Decimal,
}

/// An owned structure inside a town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Building {
    /// The building's identifier.
    pub id: BuildingId,
    /// The town it stands in.
    pub town_id: TownId,
    /// The current owner; `None` for unclaimed town property.
    pub owner: Option<CharacterId>,
    /// What kind of structure this is.
    pub kind: BuildingKind,
    /// Upgrade level, scales the property tax.
    pub level: u32,
    /// Structural condition, 0-100.
    pub condition: u32,
    /// The first day the owner failed to pay tax, if in arrears.
    pub delinquent_since: Option<NaiveDate>,
    /// Consecutive delinquent days accrued.
    pub delinquent_days: u32,
}

/// A trade caravan en route to its destination.
///
/// Arrival only notifies the owner; collecting the goods is a player
/// action outside the tick engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Caravan {
    /// The caravan's identifier.
    pub id: CaravanId,
    /// The owning character.
    pub owner: CharacterId,
    /// Destination town.
    pub destination: TownId,
    /// When the caravan arrives.
    pub arrives_at: DateTime<Utc>,
    /// Whether the arrival notification has been delivered.
    pub notified: bool,
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

/// The seat an election or impeachment concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Seat {
    /// A town mayoralty.
    Town(TownId),
    /// A kingdom crown.
    Kingdom(KingdomId),
}

/// An election for a town or kingdom seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Election {
    /// The election's identifier.
    pub id: ElectionId,
    /// The seat being contested.
    pub seat: Seat,
    /// Monotonic term counter per seat.
    pub term: u32,
    /// Current phase.
    pub phase: ElectionPhase,
    /// The day the election opened; phase transitions are measured from here.
    pub started_on: NaiveDate,
    /// The winner, once completed (absent if nobody ran).
    pub winner: Option<CharacterId>,
}

/// One declared candidate in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Candidate {
    /// The candidate character.
    pub character_id: CharacterId,
    /// When they declared; the earliest declaration wins ties.
    pub nominated_at: DateTime<Utc>,
    /// Votes received so far.
    pub votes: u32,
}

/// A town law, proposed by a character and voted on until its deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Law {
    /// The law's identifier.
    pub id: LawId,
    /// The town the law applies to.
    pub town_id: TownId,
    /// Who proposed it.
    pub proposer: CharacterId,
    /// Short title shown in reports.
    pub title: String,
    /// Votes in favor.
    pub votes_for: u32,
    /// Votes against.
    pub votes_against: u32,
    /// Current lifecycle state.
    pub status: LawStatus,
    /// Voting closes at the start of this day.
    pub vote_expires_on: NaiveDate,
    /// An active law lapses at the start of this day.
    pub active_expires_on: NaiveDate,
}

/// An impeachment motion against a sitting mayor or ruler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Impeachment {
    /// The motion's identifier.
    pub id: ImpeachmentId,
    /// The seat whose holder is challenged.
    pub seat: Seat,
    /// The office holder under challenge.
    pub target: CharacterId,
    /// Votes in favor of removal.
    pub votes_for: u32,
    /// Votes against removal.
    pub votes_against: u32,
    /// Current lifecycle state.
    pub status: ImpeachmentStatus,
    /// Voting closes at the start of this day.
    pub ends_on: NaiveDate,
}

// ---------------------------------------------------------------------------
// Recipes (static game-balance data, read-only during resolution)
// ---------------------------------------------------------------------------

/// A crafting recipe from the static balance tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Recipe {
    /// Stable lookup key (e.g. `"iron_ingot"`).
    pub key: String,
    /// The profession required to craft it.
    pub profession: ProfessionKind,
    /// Minimum profession tier.
    pub min_tier: ProfessionTier,
    /// Minimum in-town workshop level; apprentice-tier recipes are
    /// workshop-exempt regardless of this value.
    pub workshop_level: u32,
    /// The produced item.
    pub output: ItemKind,
    /// Ingredients as (item, quantity) pairs, before racial cost reduction.
    pub ingredients: Vec<(ItemKind, u32)>,
    /// Profession XP awarded on success.
    pub xp_award: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ProfessionKind;

    fn sample_character() -> Character {
        Character {
            id: CharacterId::new(),
            name: String::from("Maren"),
            race: Race::Dwarf,
            favored_profession: None,
            town_id: TownId::new(),
            gold: Decimal::new(500, 1),
            satiety: 80,
            health: 100,
            might: 3,
            finesse: 0,
            wits: -1,
            reputation: 10,
            is_npc: false,
        }
    }

    #[test]
    fn stat_modifier_follows_profession() {
        let c = sample_character();
        assert_eq!(c.stat_modifier(ProfessionKind::Miner), 3);
        assert_eq!(c.stat_modifier(ProfessionKind::Fisher), 0);
        assert_eq!(c.stat_modifier(ProfessionKind::Herbalist), -1);
    }

    #[test]
    fn character_roundtrip_serde() {
        let c = sample_character();
        let json = serde_json::to_string(&c).ok();
        assert!(json.is_some());
        let back: Result<Character, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(back.ok().as_ref(), Some(&c));
    }
}
