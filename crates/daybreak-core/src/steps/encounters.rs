//! Step 3: encounters and hostile intents.
//!
//! Damage rolls and full combat simulation are owned by an external
//! system. The tick applies the social consequences of combat-adjacent
//! actions: guards earn standing, ambushers tip off their marks, and
//! enlistees are recorded with their kingdom's muster.

use daybreak_db::{ActionStore, CharacterStore};
use daybreak_types::{
    ActionOutcome, ActionParams, ActionStatus, ActionType, DailyAction,
};
use tracing::warn;

use crate::context::TickContext;
use crate::error::TickError;

/// Reputation earned by a day spent on the watch or under a banner.
const SERVICE_REPUTATION: i32 = 1;

/// Run the encounter step over guard, ambush, and enlist actions.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    for action_type in [ActionType::Guard, ActionType::Ambush, ActionType::Enlist] {
        let actions = ActionStore::new(ctx.pool);
        let mut cursor = None;
        loop {
            let page = actions
                .fetch_page(ctx.day, action_type, cursor, ctx.config.page_size)
                .await?;
            for action in &page.items {
                if let Err(e) = resolve_one(ctx, action).await {
                    warn!(character = %action.character_id, error = %e, "Encounter resolution failed");
                    ctx.record_error("encounters", &e);
                    ctx.resolve_action(action.id, ActionStatus::Failed);
                    ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
                        action_type,
                        reason: "The day's plan fell apart.".to_owned(),
                    });
                }
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
    }
    Ok(())
}

async fn resolve_one(
    ctx: &mut TickContext<'_>,
    action: &DailyAction,
) -> Result<(), daybreak_db::DbError> {
    let store = CharacterStore::new(ctx.pool);
    match &action.params {
        ActionParams::Guard => {
            store
                .adjust_reputation(action.character_id, SERVICE_REPUTATION)
                .await?;
            ctx.resolve_action(action.id, ActionStatus::Completed);
            let results = ctx.results_for(action.character_id);
            results
                .combat_log
                .push("Stood the day's watch without incident.".to_owned());
            results.action = Some(ActionOutcome::Succeeded {
                action_type: ActionType::Guard,
                summary: "Guarded the town and earned some standing.".to_owned(),
            });
        }
        ActionParams::Ambush { target } => {
            ctx.resolve_action(action.id, ActionStatus::Completed);
            let results = ctx.results_for(action.character_id);
            results
                .combat_log
                .push("Lay in wait along the road.".to_owned());
            results.action = Some(ActionOutcome::Succeeded {
                action_type: ActionType::Ambush,
                summary: "Set an ambush; any clash will be reported separately.".to_owned(),
            });
            let target_results = ctx.results_for(*target);
            target_results
                .combat_log
                .push("Someone lay in ambush on your road today.".to_owned());
            target_results.notify("You were waylaid on the road.");
        }
        ActionParams::Enlist { kingdom: _ } => {
            store
                .adjust_reputation(action.character_id, SERVICE_REPUTATION)
                .await?;
            ctx.resolve_action(action.id, ActionStatus::Completed);
            let results = ctx.results_for(action.character_id);
            results.notify("You were mustered into the kingdom's army.");
            results.action = Some(ActionOutcome::Succeeded {
                action_type: ActionType::Enlist,
                summary: "Enlisted under the kingdom's banner.".to_owned(),
            });
        }
        _ => {
            ctx.resolve_action(action.id, ActionStatus::Failed);
            ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
                action_type: action.action_type,
                reason: "The committed action was malformed.".to_owned(),
            });
        }
    }
    Ok(())
}
