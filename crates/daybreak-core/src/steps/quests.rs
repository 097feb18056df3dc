//! Step 10: quest and achievement hooks.
//!
//! Quest state lives in an external system. The tick fires one hook per
//! processed character carrying whether their committed action
//! succeeded; the quest system advances its own ledgers from there.

use daybreak_types::{ActionOutcome, GameEvent};

use crate::context::TickContext;
use crate::error::TickError;

/// Run the quest-hook step over every processed character.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let hooks: Vec<GameEvent> = ctx
        .results
        .iter()
        .map(|(&character_id, results)| GameEvent::QuestHook {
            character_id,
            day: ctx.day,
            action_succeeded: matches!(results.action, Some(ActionOutcome::Succeeded { .. })),
        })
        .collect();
    ctx.publisher.publish_all(&hooks).await;
    Ok(())
}
