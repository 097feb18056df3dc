//! The rest resolver.
//!
//! Rest heals a fixed base scaled by the comfort of where the character
//! sleeps. Incapacitated characters are defaulted to rest by the rest
//! step, but a body too starved to act recovers nothing.

use daybreak_types::HungerState;

/// Health restored by a night's rest at neutral comfort.
pub const BASE_HEAL: u32 = 10;

/// The health gauge ceiling.
pub const MAX_HEALTH: u32 = 100;

/// Comfort multiplier for sleeping rough, in percent.
pub const ROUGH_COMFORT_PCT: u32 = 70;

/// Comfort multiplier for a night at an inn, in percent.
pub const INN_COMFORT_PCT: u32 = 150;

/// The effects of one rest action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestEffects {
    /// Health after resting, capped at the gauge ceiling.
    pub new_health: u32,
    /// How much was actually healed.
    pub healed: u32,
}

/// Resolve one rest action.
///
/// `comfort_pct` is a percentage multiplier where 100 is neutral
/// lodging; the rest step derives it from where the character sleeps.
pub fn resolve_rest(health: u32, comfort_pct: u32, hunger: HungerState) -> RestEffects {
    if hunger == HungerState::Incapacitated {
        return RestEffects {
            new_health: health.min(MAX_HEALTH),
            healed: 0,
        };
    }

    let healed = u64::from(BASE_HEAL)
        .saturating_mul(u64::from(comfort_pct))
        .checked_div(100)
        .unwrap_or(0);
    let healed = u32::try_from(healed).unwrap_or(u32::MAX);

    let new_health = health.saturating_add(healed).min(MAX_HEALTH);
    RestEffects {
        new_health,
        healed: new_health.saturating_sub(health.min(MAX_HEALTH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_comfort_heals_the_base() {
        let r = resolve_rest(50, 100, HungerState::Sated);
        assert_eq!(r, RestEffects { new_health: 60, healed: 10 });
    }

    #[test]
    fn inn_comfort_heals_more_than_sleeping_rough() {
        let inn = resolve_rest(50, INN_COMFORT_PCT, HungerState::Sated);
        let rough = resolve_rest(50, ROUGH_COMFORT_PCT, HungerState::Sated);
        assert!(inn.healed > rough.healed);
        assert_eq!(inn.healed, 15);
        assert_eq!(rough.healed, 7);
    }

    #[test]
    fn healing_caps_at_full_health() {
        let r = resolve_rest(95, 100, HungerState::Sated);
        assert_eq!(r, RestEffects { new_health: 100, healed: 5 });
        let full = resolve_rest(100, 150, HungerState::Stuffed);
        assert_eq!(full.healed, 0);
    }

    #[test]
    fn incapacitated_rest_heals_nothing() {
        let r = resolve_rest(40, INN_COMFORT_PCT, HungerState::Incapacitated);
        assert_eq!(r, RestEffects { new_health: 40, healed: 0 });
    }
}
