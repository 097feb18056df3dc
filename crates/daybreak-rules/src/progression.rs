//! Profession progression: the tier ladder and XP roll-forward.
//!
//! Levels run 1-100. The tier is always a pure function of level, so a
//! persisted `(tier, level)` pair can never drift as long as every write
//! goes through [`apply_xp`]. XP required to advance from level N to N+1
//! is `N * 50`; a single large award may produce several level-ups.

use daybreak_types::ProfessionTier;

use crate::error::RulesError;

/// The level cap.
pub const MAX_LEVEL: u32 = 100;

/// XP multiplier per level for the next-level threshold.
const XP_PER_LEVEL: u32 = 50;

/// Gather XP awarded per successful gather; character XP is half of the
/// profession award, rounded down.
pub const XP_GATHER: u32 = 10;

/// The tier a level falls in. Input below 1 is treated as level 1 and
/// above the cap as level 100, so the function is total.
pub const fn tier_for_level(level: u32) -> ProfessionTier {
    if level <= 15 {
        ProfessionTier::Apprentice
    } else if level <= 30 {
        ProfessionTier::Journeyman
    } else if level <= 50 {
        ProfessionTier::Adept
    } else if level <= 70 {
        ProfessionTier::Expert
    } else if level <= 90 {
        ProfessionTier::Master
    } else {
        ProfessionTier::Grandmaster
    }
}

/// The flat bonus a tier contributes to work rolls (proficiency bonus).
pub const fn proficiency_bonus(tier: ProfessionTier) -> i32 {
    match tier {
        ProfessionTier::Apprentice => 0,
        ProfessionTier::Journeyman => 1,
        ProfessionTier::Adept => 2,
        ProfessionTier::Expert => 3,
        ProfessionTier::Master => 4,
        ProfessionTier::Grandmaster => 5,
    }
}

/// The XP threshold to advance from `level` to `level + 1`, or `None`
/// at the cap.
pub const fn xp_to_next(level: u32) -> Option<u32> {
    if level >= MAX_LEVEL {
        return None;
    }
    let floor = if level == 0 { 1 } else { level };
    floor.checked_mul(XP_PER_LEVEL)
}

/// The result of applying an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Level after the award.
    pub level: u32,
    /// XP within the new level.
    pub xp: u32,
    /// Tier after the award (always `tier_for_level(level)`).
    pub tier: ProfessionTier,
    /// How many level-ups the award produced.
    pub levels_gained: u32,
}

/// Roll an XP award forward through any number of level-ups.
///
/// XP never goes negative (it is unsigned by construction) and the
/// returned tier is recomputed from the final level, keeping the
/// tier/level invariant by construction.
pub fn apply_xp(level: u32, xp: u32, amount: u32) -> Result<Progress, RulesError> {
    let mut level = level.clamp(1, MAX_LEVEL);
    let mut xp = xp.checked_add(amount).ok_or_else(|| {
        RulesError::ArithmeticOverflow {
            context: String::from("profession XP accumulation"),
        }
    })?;
    let mut levels_gained = 0u32;

    while let Some(threshold) = xp_to_next(level) {
        if xp < threshold {
            break;
        }
        xp = xp.saturating_sub(threshold);
        level = level.saturating_add(1);
        levels_gained = levels_gained.saturating_add(1);
    }

    // At the cap, surplus XP is discarded.
    if level >= MAX_LEVEL {
        level = MAX_LEVEL;
        xp = 0;
    }

    Ok(Progress {
        level,
        xp,
        tier: tier_for_level(level),
        levels_gained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_band_boundaries() {
        assert_eq!(tier_for_level(1), ProfessionTier::Apprentice);
        assert_eq!(tier_for_level(15), ProfessionTier::Apprentice);
        assert_eq!(tier_for_level(16), ProfessionTier::Journeyman);
        assert_eq!(tier_for_level(30), ProfessionTier::Journeyman);
        assert_eq!(tier_for_level(31), ProfessionTier::Adept);
        assert_eq!(tier_for_level(50), ProfessionTier::Adept);
        assert_eq!(tier_for_level(51), ProfessionTier::Expert);
        assert_eq!(tier_for_level(70), ProfessionTier::Expert);
        assert_eq!(tier_for_level(71), ProfessionTier::Master);
        assert_eq!(tier_for_level(90), ProfessionTier::Master);
        assert_eq!(tier_for_level(91), ProfessionTier::Grandmaster);
        assert_eq!(tier_for_level(100), ProfessionTier::Grandmaster);
    }

    #[test]
    fn single_level_up_with_remainder() {
        // Level 1 -> 2 costs 50; award 70 leaves 20 inside level 2.
        let p = apply_xp(1, 0, 70).ok();
        assert_eq!(
            p,
            Some(Progress {
                level: 2,
                xp: 20,
                tier: ProfessionTier::Apprentice,
                levels_gained: 1,
            })
        );
    }

    #[test]
    fn multiple_level_ups_single_award() {
        // 1->2 costs 50, 2->3 costs 100: total 150.
        let p = apply_xp(1, 0, 150).ok();
        assert_eq!(
            p,
            Some(Progress {
                level: 3,
                xp: 0,
                tier: ProfessionTier::Apprentice,
                levels_gained: 2,
            })
        );
    }

    #[test]
    fn tier_promotion_happens_at_threshold() {
        // Level 15 -> 16 crosses Apprentice -> Journeyman.
        let p = apply_xp(15, 0, 15 * 50).ok();
        assert_eq!(p.map(|p| p.level), Some(16));
        assert_eq!(p.map(|p| p.tier), Some(ProfessionTier::Journeyman));
    }

    #[test]
    fn no_level_up_below_threshold() {
        let p = apply_xp(10, 100, 50).ok();
        assert_eq!(p.map(|p| p.level), Some(10));
        assert_eq!(p.map(|p| p.xp), Some(150));
        assert_eq!(p.map(|p| p.levels_gained), Some(0));
    }

    #[test]
    fn capped_at_level_100() {
        let p = apply_xp(100, 0, 10_000).ok();
        assert_eq!(p.map(|p| p.level), Some(100));
        assert_eq!(p.map(|p| p.xp), Some(0));
        assert_eq!(p.map(|p| p.tier), Some(ProfessionTier::Grandmaster));
    }

    #[test]
    fn tier_level_invariant_holds_after_any_award() {
        for (level, xp, amount) in [(1, 0, 9999), (40, 400, 1), (89, 0, 4450), (99, 0, 4950)] {
            let p = apply_xp(level, xp, amount).ok();
            assert!(p.is_some());
            if let Some(p) = p {
                assert_eq!(p.tier, tier_for_level(p.level));
            }
        }
    }

    #[test]
    fn proficiency_scales_with_tier() {
        assert_eq!(proficiency_bonus(ProfessionTier::Apprentice), 0);
        assert_eq!(proficiency_bonus(ProfessionTier::Grandmaster), 5);
    }
}
