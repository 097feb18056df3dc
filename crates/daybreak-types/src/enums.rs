//! Enumeration types for the Daybreak tick engine.
//!
//! Covers the action catalog, the hunger ladder, races and professions,
//! profession tiers, craft quality tiers, world resources, building kinds,
//! and the governance state machines.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The kind of action a character can lock in for one game day.
///
/// Exactly one action per character per day. Travel and encounter
/// resolution are delegated to external systems; the tick engine only
/// sequences them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionType {
    /// Harvest a resource from the character's current town.
    Gather,
    /// Craft an item from a recipe.
    Craft,
    /// Travel toward another town (resolved externally).
    Travel,
    /// Rest to recover health and comfort.
    Rest,
    /// Stand guard over a town or caravan.
    Guard,
    /// Lie in ambush on a travel route (resolved externally).
    Ambush,
    /// Enlist in a kingdom's army.
    Enlist,
    /// Propose a new town law.
    ProposeLaw,
}

impl ActionType {
    /// All action types in a stable order, used for per-type tick counters.
    pub const ALL: [Self; 8] = [
        Self::Gather,
        Self::Craft,
        Self::Travel,
        Self::Rest,
        Self::Guard,
        Self::Ambush,
        Self::Enlist,
        Self::ProposeLaw,
    ];
}

/// Lifecycle status of a daily action row.
///
/// Rows are created `LockedIn` by the submission API and become
/// immutable history once the day's tick resolves them. A failed
/// resolution is persisted as `Failed` so history distinguishes it
/// from a success; the player additionally sees a plain-language
/// notification in their daily report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionStatus {
    /// Committed for the current day, awaiting the tick.
    LockedIn,
    /// Resolved successfully by the tick.
    Completed,
    /// Resolution failed; the reason is in the character's daily report.
    Failed,
}

// ---------------------------------------------------------------------------
// Hunger
// ---------------------------------------------------------------------------

/// The shared hunger ladder, derived from a character's satiety gauge.
///
/// Ordering matters: variants are declared from best-fed to worst, and
/// the work gate compares against [`HungerState::Incapacitated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum HungerState {
    /// Recently feasted; slight bonus to yields.
    Stuffed,
    /// Well fed; no modifier.
    Sated,
    /// Hungry; reduced yields.
    Hungry,
    /// Starving; severely reduced yields.
    Starving,
    /// Too weak to act. Only REST may be submitted, and rest heals nothing.
    Incapacitated,
}

/// The revenant soul-fade ladder.
///
/// Revenants do not eat; their binding to the world fades instead. Each
/// stage maps onto the shared [`HungerState`] ladder via
/// `daybreak_rules::hunger::fade_to_hunger` so the resolvers never
/// special-case the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SoulFadeStage {
    /// Fully anchored to the world.
    Vivid,
    /// Slightly translucent; no penalty yet.
    Dimming,
    /// Noticeably faded.
    Waning,
    /// Barely present.
    Guttering,
    /// Unable to touch the physical world.
    Extinguished,
}

// ---------------------------------------------------------------------------
// Races and professions
// ---------------------------------------------------------------------------

/// Playable races. Each carries a static bonus table in `daybreak-rules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Race {
    /// Baseline race; no modifiers.
    Human,
    /// Forest-attuned; herbalism and quality bonuses.
    Elf,
    /// Mountain-attuned; mining and smithing bonuses.
    Dwarf,
    /// Brute strength; raw yield bonuses, quality penalty.
    Orc,
    /// Water-dwelling; fishing bonuses, penalized gathering on land.
    Merfolk,
    /// Night-attuned; penalized while working in daylight.
    Duskborn,
    /// Mixed heritage; carries one player-chosen favored profession.
    Halfbreed,
    /// Undying; tracks soul fade instead of hunger.
    Revenant,
}

/// A profession a character can practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ProfessionKind {
    /// Ore extraction (gathering).
    Miner,
    /// Timber felling (gathering).
    Lumberjack,
    /// Herb collection (gathering).
    Herbalist,
    /// Fishing (gathering).
    Fisher,
    /// Metalwork (crafting).
    Blacksmith,
    /// Potions and tinctures (crafting).
    Alchemist,
    /// Woodwork (crafting).
    Carpenter,
    /// Cloth and leather (crafting).
    Tailor,
    /// Lodging and meals (service).
    Innkeeper,
    /// Treatment of wounds (service).
    Healer,
}

/// Broad profession families, used by the bonus tables and the work step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ProfessionCategory {
    /// Resource extraction professions.
    Gathering,
    /// Item creation professions.
    Crafting,
    /// Daily-wage service professions.
    Service,
}

impl ProfessionKind {
    /// The family this profession belongs to.
    pub const fn category(self) -> ProfessionCategory {
        match self {
            Self::Miner | Self::Lumberjack | Self::Herbalist | Self::Fisher => {
                ProfessionCategory::Gathering
            }
            Self::Blacksmith | Self::Alchemist | Self::Carpenter | Self::Tailor => {
                ProfessionCategory::Crafting
            }
            Self::Innkeeper | Self::Healer => ProfessionCategory::Service,
        }
    }
}

/// The six-step proficiency ladder. A pure function of level (1-100);
/// see `daybreak_rules::progression::tier_for_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ProfessionTier {
    /// Levels 1-15.
    Apprentice,
    /// Levels 16-30.
    Journeyman,
    /// Levels 31-50.
    Adept,
    /// Levels 51-70.
    Expert,
    /// Levels 71-90.
    Master,
    /// Levels 91-100.
    Grandmaster,
}

// ---------------------------------------------------------------------------
// Items and quality
// ---------------------------------------------------------------------------

/// The six ordered craft-outcome grades, mapped from a quality roll total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum QualityTier {
    /// Roll total below 10.
    Poor,
    /// Roll total 10-13.
    Common,
    /// Roll total 14-17.
    Fine,
    /// Roll total 18-21.
    Superior,
    /// Roll total 22-25.
    Exceptional,
    /// Roll total 26 and above.
    Legendary,
}

impl QualityTier {
    /// The flat bonus an ingredient of this quality contributes to a
    /// craft-quality roll (quantity-weighted across consumed stacks).
    pub const fn ingredient_bonus(self) -> i32 {
        match self {
            Self::Poor => 0,
            Self::Common => 1,
            Self::Fine => 2,
            Self::Superior => 3,
            Self::Exceptional => 4,
            Self::Legendary => 5,
        }
    }
}

/// A gatherable or craftable item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    // --- Raw materials (gatherable) ---
    /// Raw iron ore from town mines.
    IronOre,
    /// Felled timber from town forests.
    Timber,
    /// Medicinal and culinary herbs.
    Herbs,
    /// Fresh-caught fish.
    Fish,
    /// River clay.
    Clay,
    /// Quarried stone.
    Stone,

    // --- Crafted goods ---
    /// A smithed iron ingot.
    IronIngot,
    /// A carpentered plank bundle.
    Planks,
    /// A brewed healing tincture.
    Tincture,
    /// A stitched traveling cloak.
    Cloak,
    /// A cooked meal; grants a food buff when eaten.
    Meal,
}

impl ItemKind {
    /// Whether the item can be harvested directly from a town resource node.
    pub const fn is_raw_material(self) -> bool {
        matches!(
            self,
            Self::IronOre | Self::Timber | Self::Herbs | Self::Fish | Self::Clay | Self::Stone
        )
    }
}

/// An equippable tool kind, matched against profession families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ToolKind {
    /// Miner's pick.
    Pickaxe,
    /// Lumberjack's axe.
    FellingAxe,
    /// Herbalist's sickle.
    Sickle,
    /// Fisher's rod.
    FishingRod,
    /// Smith's hammer.
    SmithingHammer,
    /// Alchemist's mortar.
    Mortar,
    /// Carpenter's saw.
    Saw,
    /// Tailor's needle set.
    NeedleSet,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// The dominant biome of a town, used by conditional racial penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Biome {
    /// Shoreline and tidal flats.
    Coast,
    /// Dense woodland.
    Forest,
    /// High peaks and mines.
    Mountain,
    /// Open farmland.
    Plains,
}

impl Biome {
    /// Whether working in this biome counts as "on land" for merfolk.
    pub const fn is_land(self) -> bool {
        !matches!(self, Self::Coast)
    }
}

/// Kinds of ownable buildings. The kind fixes the property-tax base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BuildingKind {
    /// A private dwelling.
    Cottage,
    /// A general crafting workshop.
    Workshop,
    /// A smith's forge (counts as a workshop for smithing recipes).
    Forge,
    /// A service building generating innkeeper income.
    Inn,
    /// Bulk storage.
    Warehouse,
    /// A high-tax prestige residence.
    Manor,
}

impl BuildingKind {
    /// Whether crafting recipes of the given profession can use this
    /// building as their workshop.
    pub const fn hosts_profession(self, profession: ProfessionKind) -> bool {
        match self {
            Self::Forge => matches!(profession, ProfessionKind::Blacksmith),
            Self::Workshop => matches!(
                profession,
                ProfessionKind::Alchemist | ProfessionKind::Carpenter | ProfessionKind::Tailor
            ),
            Self::Cottage | Self::Inn | Self::Warehouse | Self::Manor => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

/// Election phases. Transitions are gated purely by elapsed game days
/// since the election started (3 days of nominations, then 3 of voting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ElectionPhase {
    /// Candidates may declare.
    Nominations,
    /// Votes are cast.
    Voting,
    /// Terminal; an optional winner holds the seat.
    Completed,
}

/// Law lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LawStatus {
    /// Open for votes until the vote deadline.
    Proposed,
    /// Passed and in force until expiry.
    Active,
    /// Vote failed.
    Rejected,
    /// Was active, now lapsed.
    Expired,
}

/// Impeachment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ImpeachmentStatus {
    /// Votes are being collected until the end date.
    Active,
    /// Carried; the office was vacated.
    Passed,
    /// Did not carry.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profession_categories_are_exhaustive() {
        // Every profession maps to exactly one family.
        assert_eq!(
            ProfessionKind::Miner.category(),
            ProfessionCategory::Gathering
        );
        assert_eq!(
            ProfessionKind::Blacksmith.category(),
            ProfessionCategory::Crafting
        );
        assert_eq!(
            ProfessionKind::Innkeeper.category(),
            ProfessionCategory::Service
        );
    }

    #[test]
    fn quality_ingredient_bonuses_are_monotonic() {
        let tiers = [
            QualityTier::Poor,
            QualityTier::Common,
            QualityTier::Fine,
            QualityTier::Superior,
            QualityTier::Exceptional,
            QualityTier::Legendary,
        ];
        let mut last = -1;
        for tier in tiers {
            assert!(tier.ingredient_bonus() > last);
            last = tier.ingredient_bonus();
        }
    }

    #[test]
    fn coast_is_not_land() {
        assert!(!Biome::Coast.is_land());
        assert!(Biome::Mountain.is_land());
    }

    #[test]
    fn forge_hosts_smithing_only() {
        assert!(BuildingKind::Forge.hosts_profession(ProfessionKind::Blacksmith));
        assert!(!BuildingKind::Forge.hosts_profession(ProfessionKind::Tailor));
        assert!(BuildingKind::Workshop.hosts_profession(ProfessionKind::Tailor));
    }

    #[test]
    fn hunger_ladder_orders_worst_last() {
        assert!(HungerState::Stuffed < HungerState::Incapacitated);
        assert!(HungerState::Starving < HungerState::Incapacitated);
    }

    #[test]
    fn action_type_all_covers_every_variant() {
        assert_eq!(ActionType::ALL.len(), 8);
    }
}
