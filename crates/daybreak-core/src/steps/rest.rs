//! Step 9: rest resolution.
//!
//! Resting recovers health scaled by the comfort of the best lodging in
//! town. An inn beats a bedroll; an incapacitated character still rests
//! but recovers nothing until they eat.

use daybreak_db::{ActionStore, CharacterStore, WorldStore};
use daybreak_resolvers::rest::{INN_COMFORT_PCT, ROUGH_COMFORT_PCT, resolve_rest};
use daybreak_types::{ActionOutcome, ActionStatus, ActionType, DailyAction, HungerState};
use tracing::warn;

use crate::context::TickContext;
use crate::error::TickError;

/// Run the rest step over every locked-in rest action, then default
/// every incapacitated character without a completed action to a rest
/// that heals nothing.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let actions = ActionStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = actions
            .fetch_page(ctx.day, ActionType::Rest, cursor, ctx.config.page_size)
            .await?;
        for action in &page.items {
            if let Err(e) = rest_one(ctx, action).await {
                warn!(character = %action.character_id, error = %e, "Rest resolution failed");
                ctx.record_error("rest", &e);
                ctx.resolve_action(action.id, ActionStatus::Failed);
                ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
                    action_type: ActionType::Rest,
                    reason: "No rest was to be had today.".to_owned(),
                });
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    default_incapacitated_to_rest(ctx);
    Ok(())
}

/// Incapacitated characters spend the day resting whatever they locked
/// in. A failed action's reason survives as a notification; the day's
/// outcome becomes a rest that recovered nothing.
fn default_incapacitated_to_rest(ctx: &mut TickContext<'_>) {
    let incapacitated: Vec<_> = ctx
        .hunger
        .iter()
        .filter(|&(_, state)| *state == HungerState::Incapacitated)
        .map(|(id, _)| *id)
        .collect();
    for character in incapacitated {
        let results = ctx.results_for(character);
        if matches!(results.action, Some(ActionOutcome::Succeeded { .. })) {
            continue;
        }
        if let Some(ActionOutcome::Failed { reason, .. }) = results.action.take() {
            results.notify(reason);
        }
        results.action = Some(ActionOutcome::Succeeded {
            action_type: ActionType::Rest,
            summary: "Too weak for anything else, you rested and recovered no strength."
                .to_owned(),
        });
    }
}

async fn rest_one(ctx: &mut TickContext<'_>, action: &DailyAction) -> Result<(), TickError> {
    let characters = CharacterStore::new(ctx.pool);
    let world = WorldStore::new(ctx.pool);

    let character = characters.get(action.character_id).await?;
    let inn = world.best_workshop(character.town_id, &["inn"]).await?;
    let comfort = if inn.is_some() {
        INN_COMFORT_PCT
    } else {
        ROUGH_COMFORT_PCT
    };

    let fx = resolve_rest(
        character.health,
        comfort,
        ctx.hunger_for(character.id),
    );
    characters.set_health(character.id, fx.new_health).await?;

    ctx.resolve_action(action.id, ActionStatus::Completed);
    let results = ctx.results_for(character.id);
    let summary = if fx.healed == 0 {
        "Rested, but recovered no strength.".to_owned()
    } else if inn.is_some() {
        format!("Rested at the inn and recovered {} health.", fx.healed)
    } else {
        format!("Rested under the open sky and recovered {} health.", fx.healed)
    };
    results.action = Some(ActionOutcome::Succeeded {
        action_type: ActionType::Rest,
        summary,
    });
    Ok(())
}
