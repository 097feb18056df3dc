//! The daily action: one committed choice per character per game day.
//!
//! Rows are created `LockedIn` by the action-submission API before the
//! tick runs; submitting again for the same day replaces the earlier row
//! (upsert on character + day). Once the tick resolves a day, its rows
//! are immutable history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionStatus, ActionType, ItemKind};
use crate::ids::{ActionId, CharacterId, KingdomId, TownId};

/// Action-specific parameters carried alongside a [`DailyAction`].
///
/// Each variant corresponds to one [`ActionType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionParams {
    /// Parameters for [`ActionType::Gather`].
    Gather {
        /// The raw material to harvest.
        item: ItemKind,
    },
    /// Parameters for [`ActionType::Craft`].
    Craft {
        /// Key of the recipe to craft.
        recipe_key: String,
    },
    /// Parameters for [`ActionType::Travel`] (resolved externally).
    Travel {
        /// The destination town.
        destination: TownId,
    },
    /// Parameters for [`ActionType::Rest`].
    Rest,
    /// Parameters for [`ActionType::Guard`].
    Guard,
    /// Parameters for [`ActionType::Ambush`] (resolved externally).
    Ambush {
        /// The character to waylay.
        target: CharacterId,
    },
    /// Parameters for [`ActionType::Enlist`].
    Enlist {
        /// The kingdom whose army to join.
        kingdom: KingdomId,
    },
    /// Parameters for [`ActionType::ProposeLaw`].
    ProposeLaw {
        /// Short title for the proposed law.
        title: String,
        /// Days the law stays in force once passed.
        duration_days: u32,
    },
}

impl ActionParams {
    /// The action type this parameter bag belongs to.
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::Gather { .. } => ActionType::Gather,
            Self::Craft { .. } => ActionType::Craft,
            Self::Travel { .. } => ActionType::Travel,
            Self::Rest => ActionType::Rest,
            Self::Guard => ActionType::Guard,
            Self::Ambush { .. } => ActionType::Ambush,
            Self::Enlist { .. } => ActionType::Enlist,
            Self::ProposeLaw { .. } => ActionType::ProposeLaw,
        }
    }
}

/// How a character behaves if combat finds them during the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CombatStance {
    /// Fight back at full strength.
    Aggressive,
    /// Defend and disengage when possible.
    Defensive,
    /// Flee on contact.
    Evasive,
}

/// Optional combat-behavior parameters attached to a daily action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CombatBehavior {
    /// The chosen stance.
    pub stance: CombatStance,
    /// A preferred target, if the stance involves one.
    pub target: Option<CharacterId>,
}

/// One row in the action ledger: a character's single committed choice
/// for one game day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyAction {
    /// Row identifier.
    pub id: ActionId,
    /// The acting character.
    pub character_id: CharacterId,
    /// The game day this action is committed for.
    pub day: NaiveDate,
    /// The action family.
    pub action_type: ActionType,
    /// Type-specific parameters.
    pub params: ActionParams,
    /// Optional combat behavior for the day.
    pub combat: Option<CombatBehavior>,
    /// Lifecycle status.
    pub status: ActionStatus,
    /// When the action was locked in.
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_map_to_action_type() {
        assert_eq!(
            ActionParams::Gather {
                item: ItemKind::Timber
            }
            .action_type(),
            ActionType::Gather
        );
        assert_eq!(ActionParams::Rest.action_type(), ActionType::Rest);
        assert_eq!(
            ActionParams::ProposeLaw {
                title: String::from("No night markets"),
                duration_days: 14,
            }
            .action_type(),
            ActionType::ProposeLaw
        );
    }

    #[test]
    fn daily_action_roundtrip_serde() {
        let action = DailyAction {
            id: ActionId::new(),
            character_id: CharacterId::new(),
            day: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default(),
            action_type: ActionType::Craft,
            params: ActionParams::Craft {
                recipe_key: String::from("iron_ingot"),
            },
            combat: Some(CombatBehavior {
                stance: CombatStance::Defensive,
                target: None,
            }),
            status: ActionStatus::LockedIn,
            submitted_at: Utc::now(),
        };
        let json = serde_json::to_string(&action).ok();
        assert!(json.is_some());
        let back: Result<DailyAction, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(back.ok().as_ref(), Some(&action));
    }
}
