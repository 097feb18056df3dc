//! The bonus resolver: static racial/profession modifier tables.
//!
//! Tables are expressed as exhaustive `match` expressions, so every
//! lookup is O(1) and the compiler rejects an unhandled (race,
//! profession) pair. They run once per gather/craft action per tick,
//! potentially thousands of times, and must never scan anything.
//!
//! Conventions: `*_pct` fields are percentage multipliers where 100 is
//! neutral; `*_bonus` fields are flat additions to a roll total.

use daybreak_types::{Biome, ProfessionKind, Race};

/// The fixed yield bonus a half-breed's favored profession re-applies,
/// in percentage points over neutral.
pub const FAVORED_PROFESSION_YIELD_PCT: u32 = 15;

/// The flat craft-quality bonus a half-breed's favored profession grants.
pub const FAVORED_PROFESSION_QUALITY_BONUS: i32 = 1;

/// The flat roll penalty merfolk take while gathering on land.
pub const MERFOLK_LAND_PENALTY: i32 = -3;

/// The flat roll penalty duskborn take while working in daylight.
pub const DUSKBORN_DAYLIGHT_PENALTY: i32 = -2;

/// Modifiers the racial table yields for one (race, profession) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RacialModifiers {
    /// Gather yield multiplier.
    pub gather_yield_pct: u32,
    /// Gather speed multiplier (consumed by the external travel/encounter
    /// systems; carried for completeness of the table).
    pub gather_speed_pct: u32,
    /// Craft speed multiplier.
    pub craft_speed_pct: u32,
    /// Flat bonus to the craft quality roll.
    pub craft_quality_bonus: i32,
    /// Percentage knocked off recipe ingredient quantities, 0-100.
    pub material_cost_reduction_pct: u32,
}

impl RacialModifiers {
    /// A neutral set of modifiers.
    pub const NEUTRAL: Self = Self {
        gather_yield_pct: 100,
        gather_speed_pct: 100,
        craft_speed_pct: 100,
        craft_quality_bonus: 0,
        material_cost_reduction_pct: 0,
    };
}

/// Look up the racial modifiers for a profession.
///
/// `favored` is the half-breed's chosen favored profession; when it
/// matches, the fixed favored bonus is applied on top of the half-breed
/// baseline. Other races ignore it.
pub fn racial_modifiers(
    race: Race,
    profession: ProfessionKind,
    favored: Option<ProfessionKind>,
) -> RacialModifiers {
    let base = base_modifiers(race, profession);

    if race == Race::Halfbreed && favored == Some(profession) {
        return RacialModifiers {
            gather_yield_pct: base
                .gather_yield_pct
                .saturating_add(FAVORED_PROFESSION_YIELD_PCT),
            craft_quality_bonus: base
                .craft_quality_bonus
                .saturating_add(FAVORED_PROFESSION_QUALITY_BONUS),
            ..base
        };
    }

    base
}

/// The static per-race table.
const fn base_modifiers(race: Race, profession: ProfessionKind) -> RacialModifiers {
    match race {
        Race::Human | Race::Halfbreed | Race::Revenant => RacialModifiers::NEUTRAL,

        Race::Elf => match profession {
            ProfessionKind::Herbalist => RacialModifiers {
                gather_yield_pct: 120,
                gather_speed_pct: 110,
                ..RacialModifiers::NEUTRAL
            },
            ProfessionKind::Alchemist | ProfessionKind::Tailor => RacialModifiers {
                craft_quality_bonus: 2,
                ..RacialModifiers::NEUTRAL
            },
            _ => RacialModifiers::NEUTRAL,
        },

        Race::Dwarf => match profession {
            ProfessionKind::Miner => RacialModifiers {
                gather_yield_pct: 125,
                ..RacialModifiers::NEUTRAL
            },
            ProfessionKind::Blacksmith => RacialModifiers {
                craft_quality_bonus: 2,
                craft_speed_pct: 115,
                material_cost_reduction_pct: 10,
                ..RacialModifiers::NEUTRAL
            },
            _ => RacialModifiers::NEUTRAL,
        },

        Race::Orc => match profession {
            ProfessionKind::Miner | ProfessionKind::Lumberjack => RacialModifiers {
                gather_yield_pct: 130,
                ..RacialModifiers::NEUTRAL
            },
            ProfessionKind::Blacksmith
            | ProfessionKind::Alchemist
            | ProfessionKind::Carpenter
            | ProfessionKind::Tailor => RacialModifiers {
                craft_quality_bonus: -1,
                ..RacialModifiers::NEUTRAL
            },
            _ => RacialModifiers::NEUTRAL,
        },

        Race::Merfolk => match profession {
            ProfessionKind::Fisher => RacialModifiers {
                gather_yield_pct: 140,
                gather_speed_pct: 120,
                ..RacialModifiers::NEUTRAL
            },
            _ => RacialModifiers::NEUTRAL,
        },

        Race::Duskborn => match profession {
            ProfessionKind::Alchemist => RacialModifiers {
                craft_quality_bonus: 2,
                material_cost_reduction_pct: 5,
                ..RacialModifiers::NEUTRAL
            },
            _ => RacialModifiers::NEUTRAL,
        },
    }
}

/// Conditional flat roll penalties that only apply under specific world
/// conditions: merfolk gathering on land, duskborn working in daylight.
///
/// Returns a non-positive flat modifier to add to the roll total.
pub const fn conditional_penalty(race: Race, biome: Biome, is_daytime: bool) -> i32 {
    let mut penalty = 0;
    if matches!(race, Race::Merfolk) && biome.is_land() {
        penalty = MERFOLK_LAND_PENALTY;
    }
    if matches!(race, Race::Duskborn) && is_daytime {
        penalty = penalty.saturating_add(DUSKBORN_DAYLIGHT_PENALTY);
    }
    penalty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humans_are_neutral_everywhere() {
        for profession in [
            ProfessionKind::Miner,
            ProfessionKind::Fisher,
            ProfessionKind::Blacksmith,
            ProfessionKind::Innkeeper,
        ] {
            assert_eq!(
                racial_modifiers(Race::Human, profession, None),
                RacialModifiers::NEUTRAL
            );
        }
    }

    #[test]
    fn dwarf_mining_bonus() {
        let m = racial_modifiers(Race::Dwarf, ProfessionKind::Miner, None);
        assert_eq!(m.gather_yield_pct, 125);
    }

    #[test]
    fn dwarf_smithing_cost_reduction() {
        let m = racial_modifiers(Race::Dwarf, ProfessionKind::Blacksmith, None);
        assert_eq!(m.material_cost_reduction_pct, 10);
        assert_eq!(m.craft_quality_bonus, 2);
    }

    #[test]
    fn orc_quality_penalty_on_crafts() {
        let m = racial_modifiers(Race::Orc, ProfessionKind::Tailor, None);
        assert_eq!(m.craft_quality_bonus, -1);
    }

    #[test]
    fn favored_profession_applies_only_when_matching() {
        let favored = racial_modifiers(
            Race::Halfbreed,
            ProfessionKind::Carpenter,
            Some(ProfessionKind::Carpenter),
        );
        assert_eq!(
            favored.gather_yield_pct,
            100 + FAVORED_PROFESSION_YIELD_PCT
        );
        assert_eq!(favored.craft_quality_bonus, FAVORED_PROFESSION_QUALITY_BONUS);

        let other = racial_modifiers(
            Race::Halfbreed,
            ProfessionKind::Miner,
            Some(ProfessionKind::Carpenter),
        );
        assert_eq!(other, RacialModifiers::NEUTRAL);
    }

    #[test]
    fn favored_profession_ignored_for_other_races() {
        let m = racial_modifiers(Race::Elf, ProfessionKind::Miner, Some(ProfessionKind::Miner));
        assert_eq!(m, RacialModifiers::NEUTRAL);
    }

    #[test]
    fn merfolk_penalized_on_land_only() {
        assert_eq!(
            conditional_penalty(Race::Merfolk, Biome::Forest, true),
            MERFOLK_LAND_PENALTY
        );
        assert_eq!(conditional_penalty(Race::Merfolk, Biome::Coast, true), 0);
    }

    #[test]
    fn duskborn_penalized_in_daylight_only() {
        assert_eq!(
            conditional_penalty(Race::Duskborn, Biome::Plains, true),
            DUSKBORN_DAYLIGHT_PENALTY
        );
        assert_eq!(conditional_penalty(Race::Duskborn, Biome::Plains, false), 0);
    }

    #[test]
    fn penalties_never_positive() {
        for race in [
            Race::Human,
            Race::Elf,
            Race::Dwarf,
            Race::Orc,
            Race::Merfolk,
            Race::Duskborn,
            Race::Halfbreed,
            Race::Revenant,
        ] {
            for daytime in [true, false] {
                assert!(conditional_penalty(race, Biome::Mountain, daytime) <= 0);
            }
        }
    }
}
