//! Tool contribution and wear, shared by the gather and craft resolvers.

use daybreak_types::{EquippedTool, ToolKind};

use daybreak_rules::roll::{BARE_HANDS_PCT, NEUTRAL_PCT};

/// One day's wear on an equipped tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolWear {
    /// The tool that was used.
    pub kind: ToolKind,
    /// Durability remaining after today's use.
    pub remaining: u32,
    /// Whether today's use broke the tool.
    pub broke: bool,
}

/// The yield percentage a tool (or its absence) contributes to a gather.
///
/// Bare hands carry a fixed penalty; an equipped tool adds its bonus on
/// top of neutral.
pub fn yield_pct(tool: Option<&EquippedTool>) -> u32 {
    tool.map_or(BARE_HANDS_PCT, |t| {
        NEUTRAL_PCT.saturating_add(t.bonus_pct)
    })
}

/// The flat bonus a tool contributes to a craft quality roll: a tenth of
/// its percent bonus, so a +20% tool adds +2 to the total.
pub fn quality_bonus(tool: Option<&EquippedTool>) -> i32 {
    tool.map_or(0, |t| {
        i32::try_from(t.bonus_pct.checked_div(10).unwrap_or(0)).unwrap_or(0)
    })
}

/// Apply one work action's wear to the equipped tool, if any.
pub fn wear(tool: Option<&EquippedTool>) -> Option<ToolWear> {
    tool.map(|t| {
        let remaining = t.durability.saturating_sub(1);
        ToolWear {
            kind: t.kind,
            remaining,
            broke: remaining == 0,
        }
    })
}

#[cfg(test)]
mod tests {
    use daybreak_types::CharacterId;

    use super::*;

    fn tool(bonus_pct: u32, durability: u32) -> EquippedTool {
        EquippedTool {
            character_id: CharacterId::new(),
            kind: ToolKind::Pickaxe,
            bonus_pct,
            durability,
        }
    }

    #[test]
    fn bare_hands_are_penalized() {
        assert_eq!(yield_pct(None), BARE_HANDS_PCT);
        assert_eq!(yield_pct(Some(&tool(30, 5))), 130);
    }

    #[test]
    fn quality_bonus_is_a_tenth() {
        assert_eq!(quality_bonus(None), 0);
        assert_eq!(quality_bonus(Some(&tool(20, 5))), 2);
        assert_eq!(quality_bonus(Some(&tool(5, 5))), 0);
    }

    #[test]
    fn last_use_breaks_the_tool() {
        let w = wear(Some(&tool(10, 1)));
        assert_eq!(
            w,
            Some(ToolWear {
                kind: ToolKind::Pickaxe,
                remaining: 0,
                broke: true
            })
        );
        let fine = wear(Some(&tool(10, 8)));
        assert_eq!(fine.map(|w| w.broke), Some(false));
        assert_eq!(wear(None), None);
    }
}
