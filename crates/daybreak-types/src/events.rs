//! Domain events published over the notification channel.
//!
//! Delivery is best-effort: the publisher swallows and logs failures so
//! that a broken channel can never abort a tick step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ItemKind;
use crate::ids::{BuildingId, CaravanId, CharacterId, ElectionId, TownId};

/// A domain event emitted by the tick engine, scoped to the affected
/// character(s) or broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GameEvent {
    /// Property tax was charged to a building owner.
    TaxDue {
        /// The taxed building.
        building_id: BuildingId,
        /// The paying owner.
        owner: CharacterId,
        /// The amount charged.
        #[ts(as = "String")]
        amount: Decimal,
    },
    /// A building owner could not pay and is now in arrears.
    TaxDelinquent {
        /// The delinquent building.
        building_id: BuildingId,
        /// The owner in arrears.
        owner: CharacterId,
        /// Consecutive delinquent days accrued.
        days: u32,
    },
    /// Seven delinquent days elapsed; ownership passed to the mayor.
    BuildingSeized {
        /// The seized building.
        building_id: BuildingId,
        /// The former owner.
        previous_owner: CharacterId,
        /// The mayor who received it.
        new_owner: CharacterId,
    },
    /// A building's condition crossed the low-condition threshold.
    BuildingConditionLow {
        /// The degrading building.
        building_id: BuildingId,
        /// Condition after today's decay.
        condition: u32,
    },
    /// A building's condition crossed the condemned threshold.
    BuildingCondemned {
        /// The condemned building.
        building_id: BuildingId,
    },
    /// Gathering depleted a town resource below the warning threshold.
    ResourceDepletedWarning {
        /// The affected town.
        town_id: TownId,
        /// The scarce material.
        item: ItemKind,
        /// Abundance after the gather.
        abundance: u32,
    },
    /// A character's equipped tool broke at zero durability.
    ToolBroken {
        /// The character whose tool broke.
        character_id: CharacterId,
    },
    /// A caravan reached its destination and awaits collection.
    CaravanArrived {
        /// The arrived caravan.
        caravan_id: CaravanId,
        /// Its owner.
        owner: CharacterId,
    },
    /// An election finished; the seat may have a new holder.
    ElectionCompleted {
        /// The completed election.
        election_id: ElectionId,
        /// The winner, if anybody ran.
        winner: Option<CharacterId>,
    },
    /// Fired once per character after work resolution so the external
    /// quest/achievement system can advance its own state.
    QuestHook {
        /// The character whose day resolved.
        character_id: CharacterId,
        /// The resolved game day.
        day: NaiveDate,
        /// Whether the day's committed action succeeded.
        action_succeeded: bool,
    },
    /// The whole tick finished; reports for `day` are available.
    TickComplete {
        /// The resolved game day.
        day: NaiveDate,
        /// How many characters were processed.
        characters_processed: u32,
    },
}

impl GameEvent {
    /// A short stable kind tag, used as the publish subject suffix.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TaxDue { .. } => "tax_due",
            Self::TaxDelinquent { .. } => "tax_delinquent",
            Self::BuildingSeized { .. } => "building_seized",
            Self::BuildingConditionLow { .. } => "building_condition_low",
            Self::BuildingCondemned { .. } => "building_condemned",
            Self::ResourceDepletedWarning { .. } => "resource_depleted_warning",
            Self::ToolBroken { .. } => "tool_broken",
            Self::CaravanArrived { .. } => "caravan_arrived",
            Self::ElectionCompleted { .. } => "election_completed",
            Self::QuestHook { .. } => "quest_hook",
            Self::TickComplete { .. } => "tick_complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kinds_are_snake_case() {
        let event = GameEvent::ToolBroken {
            character_id: CharacterId::new(),
        };
        assert_eq!(event.kind(), "tool_broken");
    }

    #[test]
    fn event_roundtrip_serde() {
        let event = GameEvent::ResourceDepletedWarning {
            town_id: TownId::new(),
            item: ItemKind::IronOre,
            abundance: 8,
        };
        let json = serde_json::to_string(&event).ok();
        assert!(json.is_some());
        let back: Result<GameEvent, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(back.ok().as_ref(), Some(&event));
    }
}
