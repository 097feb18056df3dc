//! Per-tick result accumulation and the persisted daily report.
//!
//! [`CharacterResults`] is the ephemeral per-character accumulator the
//! orchestrator threads through every pipeline step. It lives for one
//! tick invocation, is flushed to a [`DailyReport`] row by the results
//! delivery step, and is then discarded.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ActionType;
use crate::ids::CharacterId;

/// Outcome of the food/consumption step for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FoodOutcome {
    /// Ate from inventory; carries what was eaten.
    Ate {
        /// Human-readable description of the meal.
        meal: String,
        /// Whether the meal granted a work buff.
        buffed: bool,
    },
    /// Had nothing to eat; satiety dropped.
    WentHungry,
    /// Revenants fade instead of hungering.
    Faded,
}

/// Outcome of the day's committed action for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionOutcome {
    /// The action resolved successfully.
    Succeeded {
        /// Which action family resolved.
        action_type: ActionType,
        /// Plain-language summary for the report.
        summary: String,
    },
    /// The action failed a precondition or faulted during resolution.
    Failed {
        /// Which action family failed.
        action_type: ActionType,
        /// Plain-language reason shown to the player.
        reason: String,
    },
    /// The character had no action locked in and idled.
    Idled,
}

/// The ephemeral per-character accumulator for one tick.
///
/// Created empty by the orchestrator, mutated by every step, flushed by
/// results delivery. Process-local; never persisted in this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterResults {
    /// What the character ate (or failed to eat) today.
    pub food: Option<FoodOutcome>,
    /// How the day's committed action resolved.
    pub action: Option<ActionOutcome>,
    /// Net gold change across all steps.
    #[ts(as = "String")]
    pub gold_delta: Decimal,
    /// Total XP earned (profession plus character XP).
    pub xp_earned: u32,
    /// Combat log lines, if combat found the character.
    pub combat_log: Vec<String>,
    /// Quest-progress event descriptions.
    pub quest_events: Vec<String>,
    /// Free-text notifications (precondition failures, warnings).
    pub notifications: Vec<String>,
    /// World events that mention this character.
    pub world_events: Vec<String>,
}

impl CharacterResults {
    /// Append a player-facing notification line.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(message.into());
    }

    /// Add to the net gold delta (may be negative).
    pub fn add_gold(&mut self, delta: Decimal) {
        self.gold_delta = self.gold_delta.saturating_add(delta);
    }

    /// Add earned XP, saturating at the integer bound.
    pub const fn add_xp(&mut self, amount: u32) {
        self.xp_earned = self.xp_earned.saturating_add(amount);
    }
}

/// The persisted daily report, one row per character per game day.
///
/// Keyed by (character, ISO day); results delivery upserts on that key
/// so re-running the step never duplicates rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyReport {
    /// The character the report belongs to.
    pub character_id: CharacterId,
    /// The game day the report covers.
    pub day: NaiveDate,
    /// The accumulated results for the day.
    pub results: CharacterResults,
}

/// Per-tick operational summary, persisted once per tick and returned
/// by the manual trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickSummary {
    /// The game day this tick resolved.
    pub day: NaiveDate,
    /// Characters that appeared in at least one step.
    pub characters_processed: u32,
    /// Resolved action counts per action family.
    pub action_counts: BTreeMap<ActionType, u32>,
    /// Wall-clock duration of the whole tick in milliseconds.
    pub duration_ms: u64,
    /// Step- and item-level errors encountered (the tick still completed).
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_starts_empty() {
        let r = CharacterResults::default();
        assert!(r.food.is_none());
        assert!(r.action.is_none());
        assert_eq!(r.gold_delta, Decimal::ZERO);
        assert_eq!(r.xp_earned, 0);
        assert!(r.notifications.is_empty());
    }

    #[test]
    fn gold_delta_accumulates_signed() {
        let mut r = CharacterResults::default();
        r.add_gold(Decimal::new(125, 1)); // +12.5
        r.add_gold(Decimal::new(-50, 1)); // -5.0
        assert_eq!(r.gold_delta, Decimal::new(75, 1));
    }

    #[test]
    fn xp_saturates() {
        let mut r = CharacterResults::default();
        r.add_xp(u32::MAX);
        r.add_xp(10);
        assert_eq!(r.xp_earned, u32::MAX);
    }
}
