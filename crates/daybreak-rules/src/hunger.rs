//! Hunger-state derivation and the soul-fade remap.
//!
//! A character's persisted satiety gauge (0-100) maps onto the shared
//! [`HungerState`] ladder. Revenants do not hunger: their gauge measures
//! how firmly they are bound to the world, mapped first onto a
//! [`SoulFadeStage`] and then onto the shared ladder by an explicit,
//! exhaustive remap so resolvers never special-case the race.

use daybreak_types::{ActionType, HungerState, Race, SoulFadeStage};

/// Satiety lost per game day when a character does not eat.
pub const DAILY_SATIETY_COST: u32 = 15;

/// Satiety restored by eating one unit of food.
pub const MEAL_SATIETY_GAIN: u32 = 30;

/// The work multiplier a cooked-meal food buff grants, in percent.
pub const FOOD_BUFF_PCT: u32 = 110;

/// Derive the hunger state for a character from race and satiety gauge.
pub const fn hunger_for(race: Race, satiety: u32) -> HungerState {
    match race {
        Race::Revenant => fade_to_hunger(fade_stage_for(satiety)),
        _ => hunger_state_for(satiety),
    }
}

/// The satiety thresholds of the shared hunger ladder.
pub const fn hunger_state_for(satiety: u32) -> HungerState {
    if satiety >= 90 {
        HungerState::Stuffed
    } else if satiety >= 50 {
        HungerState::Sated
    } else if satiety >= 25 {
        HungerState::Hungry
    } else if satiety >= 1 {
        HungerState::Starving
    } else {
        HungerState::Incapacitated
    }
}

/// The binding thresholds of the revenant soul-fade ladder.
pub const fn fade_stage_for(binding: u32) -> SoulFadeStage {
    if binding >= 90 {
        SoulFadeStage::Vivid
    } else if binding >= 50 {
        SoulFadeStage::Dimming
    } else if binding >= 25 {
        SoulFadeStage::Waning
    } else if binding >= 1 {
        SoulFadeStage::Guttering
    } else {
        SoulFadeStage::Extinguished
    }
}

/// Remap a soul-fade stage onto the shared hunger ladder.
///
/// Exhaustive by construction; a new fade stage cannot be added without
/// deciding its hunger equivalent here.
pub const fn fade_to_hunger(stage: SoulFadeStage) -> HungerState {
    match stage {
        SoulFadeStage::Vivid => HungerState::Stuffed,
        SoulFadeStage::Dimming => HungerState::Sated,
        SoulFadeStage::Waning => HungerState::Hungry,
        SoulFadeStage::Guttering => HungerState::Starving,
        SoulFadeStage::Extinguished => HungerState::Incapacitated,
    }
}

/// The work-yield multiplier for a hunger state, in percent.
pub const fn work_multiplier_pct(state: HungerState) -> u32 {
    match state {
        HungerState::Stuffed => 110,
        HungerState::Sated => 100,
        HungerState::Hungry => 75,
        HungerState::Starving => 40,
        HungerState::Incapacitated => 0,
    }
}

/// Whether a hunger state blocks gathering and crafting entirely.
pub const fn blocks_work(state: HungerState) -> bool {
    matches!(state, HungerState::Incapacitated)
}

/// Whether a character in this hunger state may submit the given action.
///
/// Incapacitated characters may only submit REST; their tick processing
/// defaults to a rest that heals nothing.
pub const fn may_submit(state: HungerState, action: ActionType) -> bool {
    !matches!(state, HungerState::Incapacitated) || matches!(action, ActionType::Rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satiety_thresholds() {
        assert_eq!(hunger_state_for(100), HungerState::Stuffed);
        assert_eq!(hunger_state_for(90), HungerState::Stuffed);
        assert_eq!(hunger_state_for(89), HungerState::Sated);
        assert_eq!(hunger_state_for(50), HungerState::Sated);
        assert_eq!(hunger_state_for(49), HungerState::Hungry);
        assert_eq!(hunger_state_for(25), HungerState::Hungry);
        assert_eq!(hunger_state_for(24), HungerState::Starving);
        assert_eq!(hunger_state_for(1), HungerState::Starving);
        assert_eq!(hunger_state_for(0), HungerState::Incapacitated);
    }

    #[test]
    fn fade_remap_is_order_preserving() {
        let stages = [
            SoulFadeStage::Vivid,
            SoulFadeStage::Dimming,
            SoulFadeStage::Waning,
            SoulFadeStage::Guttering,
            SoulFadeStage::Extinguished,
        ];
        let mut last = None;
        for stage in stages {
            let hunger = fade_to_hunger(stage);
            if let Some(prev) = last {
                assert!(hunger > prev);
            }
            last = Some(hunger);
        }
    }

    #[test]
    fn revenants_use_the_fade_ladder() {
        // Same gauge value, same effective state through either path.
        assert_eq!(hunger_for(Race::Revenant, 60), HungerState::Sated);
        assert_eq!(hunger_for(Race::Revenant, 0), HungerState::Incapacitated);
        assert_eq!(hunger_for(Race::Human, 60), HungerState::Sated);
    }

    #[test]
    fn incapacitated_blocks_everything_but_rest() {
        assert!(may_submit(HungerState::Incapacitated, ActionType::Rest));
        assert!(!may_submit(HungerState::Incapacitated, ActionType::Gather));
        assert!(!may_submit(HungerState::Incapacitated, ActionType::ProposeLaw));
        assert!(may_submit(HungerState::Starving, ActionType::Gather));
    }

    #[test]
    fn only_incapacitated_blocks_work() {
        assert!(blocks_work(HungerState::Incapacitated));
        assert!(!blocks_work(HungerState::Starving));
        assert!(!blocks_work(HungerState::Sated));
    }

    #[test]
    fn multiplier_decreases_with_hunger() {
        assert!(work_multiplier_pct(HungerState::Stuffed) > work_multiplier_pct(HungerState::Sated));
        assert!(work_multiplier_pct(HungerState::Sated) > work_multiplier_pct(HungerState::Hungry));
        assert!(work_multiplier_pct(HungerState::Hungry) > work_multiplier_pct(HungerState::Starving));
        assert_eq!(work_multiplier_pct(HungerState::Incapacitated), 0);
    }
}
