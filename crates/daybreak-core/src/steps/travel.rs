//! Step 2: travel resolution.
//!
//! Route simulation (nodes, distances, road events) is owned by an
//! external system. The tick only finalizes a committed travel action:
//! relocate the character to the destination town and report arrival.

use daybreak_db::{ActionStore, CharacterStore};
use daybreak_types::{ActionOutcome, ActionParams, ActionStatus, ActionType, DailyAction};
use tracing::warn;

use crate::context::TickContext;
use crate::error::TickError;

/// Run the travel step over every locked-in travel action.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let actions = ActionStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = actions
            .fetch_page(ctx.day, ActionType::Travel, cursor, ctx.config.page_size)
            .await?;
        for action in &page.items {
            if let Err(e) = relocate_one(ctx, action).await {
                warn!(character = %action.character_id, error = %e, "Travel resolution failed");
                ctx.record_error("travel", &e);
                ctx.resolve_action(action.id, ActionStatus::Failed);
                let results = ctx.results_for(action.character_id);
                results.action = Some(ActionOutcome::Failed {
                    action_type: ActionType::Travel,
                    reason: "The journey could not be completed.".to_owned(),
                });
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(())
}

async fn relocate_one(
    ctx: &mut TickContext<'_>,
    action: &DailyAction,
) -> Result<(), daybreak_db::DbError> {
    let ActionParams::Travel { destination } = action.params else {
        ctx.resolve_action(action.id, ActionStatus::Failed);
        ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
            action_type: ActionType::Travel,
            reason: "No destination was given.".to_owned(),
        });
        return Ok(());
    };

    let Some(town) = ctx.towns.get(&destination) else {
        ctx.resolve_action(action.id, ActionStatus::Failed);
        ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
            action_type: ActionType::Travel,
            reason: "That destination does not exist.".to_owned(),
        });
        return Ok(());
    };
    let town_name = town.name.clone();

    CharacterStore::new(ctx.pool)
        .set_town(action.character_id, destination)
        .await?;

    ctx.resolve_action(action.id, ActionStatus::Completed);
    let results = ctx.results_for(action.character_id);
    results.action = Some(ActionOutcome::Succeeded {
        action_type: ActionType::Travel,
        summary: format!("Arrived in {town_name}."),
    });
    Ok(())
}
