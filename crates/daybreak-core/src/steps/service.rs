//! Step 5: passive service income.
//!
//! Innkeepers and healers earn a daily wage scaled by profession level,
//! independent of the day's committed action. NPC earnings flow to town
//! treasuries in a later step, so NPCs are skipped here.

use daybreak_db::{CharacterStore, ProfessionStore};
use daybreak_rules::hunger;
use daybreak_types::PlayerProfession;
use tracing::warn;

use crate::context::TickContext;
use crate::error::TickError;

/// Run the service-income step over every active service profession.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let professions = ProfessionStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = professions
            .service_page(cursor, ctx.config.page_size)
            .await?;
        for profession in &page.items {
            if let Err(e) = pay_one(ctx, profession).await {
                warn!(character = %profession.character_id, error = %e, "Service income failed");
                ctx.record_error("service", &e);
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(())
}

async fn pay_one(
    ctx: &mut TickContext<'_>,
    profession: &PlayerProfession,
) -> Result<(), TickError> {
    // Too weak to run a trade means no custom today.
    if hunger::blocks_work(ctx.hunger_for(profession.character_id)) {
        return Ok(());
    }

    let characters = CharacterStore::new(ctx.pool);
    let character = characters.get(profession.character_id).await?;
    if character.is_npc {
        return Ok(());
    }

    let wage = daybreak_resolvers::daily_wage(profession.kind, profession.level).map_err(|e| {
        TickError::Resolver {
            character: profession.character_id,
            source: e,
        }
    })?;
    let Some(wage) = wage else {
        return Ok(());
    };

    characters.adjust_gold(character.id, wage).await?;
    let results = ctx.results_for(character.id);
    results.add_gold(wage);
    results.notify(format!("Your trade brought in {wage} gold today."));
    Ok(())
}
