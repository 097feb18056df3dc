//! Steps 13-15: world upkeep after results go out.
//!
//! NPC tradespeople pay their earnings into their town's treasury,
//! overdue loans settle or default, and everyone's reputation drifts
//! one step back toward neutral.

use daybreak_db::{CharacterStore, ProfessionStore, WorldStore};
use daybreak_types::{Loan, PlayerProfession};
use tracing::{debug, info, warn};

use crate::context::TickContext;
use crate::error::TickError;

/// Reputation cost of defaulting on a loan.
const DEFAULT_REPUTATION_PENALTY: i32 = -5;

/// NPC service earnings flow to the town, not the NPC.
pub async fn npc_income(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let professions = ProfessionStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = professions
            .service_page(cursor, ctx.config.page_size)
            .await?;
        for profession in &page.items {
            if let Err(e) = credit_npc_town(ctx, profession).await {
                warn!(character = %profession.character_id, error = %e, "NPC income failed");
                ctx.record_error("npc_income", &e);
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(())
}

async fn credit_npc_town(
    ctx: &mut TickContext<'_>,
    profession: &PlayerProfession,
) -> Result<(), TickError> {
    let characters = CharacterStore::new(ctx.pool);
    let character = characters.get(profession.character_id).await?;
    if !character.is_npc {
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

    WorldStore::new(ctx.pool)
        .credit_treasury(character.town_id, wage)
        .await?;
    debug!(npc = %character.id, town = %character.town_id, %wage, "NPC income credited to treasury");
    Ok(())
}

/// Settle or default every loan whose due date has passed.
pub async fn sweep_loans(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let characters = CharacterStore::new(ctx.pool);
    let loans = characters.due_loans(ctx.day).await?;
    for loan in loans {
        if let Err(e) = settle_one(ctx, &loan).await {
            warn!(loan = %loan.id, error = %e, "Loan sweep failed");
            ctx.record_error("loans", &e);
        }
    }
    Ok(())
}

async fn settle_one(ctx: &mut TickContext<'_>, loan: &Loan) -> Result<(), TickError> {
    let characters = CharacterStore::new(ctx.pool);
    let debtor = characters.get(loan.debtor).await?;

    if debtor.gold >= loan.principal {
        characters.settle_loan(loan).await?;
        info!(loan = %loan.id, debtor = %loan.debtor, "Loan settled");
        let results = ctx.results_for(loan.debtor);
        results.add_gold(loan.principal.saturating_mul(rust_decimal::Decimal::NEGATIVE_ONE));
        results.notify(format!("Your loan of {} gold was repaid in full.", loan.principal));
        let creditor = ctx.results_for(loan.creditor);
        creditor.add_gold(loan.principal);
        creditor.notify(format!("A loan of {} gold was repaid to you.", loan.principal));
    } else {
        characters.mark_defaulted(loan.id).await?;
        characters
            .adjust_reputation(loan.debtor, DEFAULT_REPUTATION_PENALTY)
            .await?;
        info!(loan = %loan.id, debtor = %loan.debtor, "Loan defaulted");
        ctx.results_for(loan.debtor)
            .notify("You defaulted on a loan; word of it spreads.");
        ctx.results_for(loan.creditor)
            .notify("A loan owed to you went unpaid and is now in default.");
    }
    Ok(())
}

/// Drift every character's reputation one step toward neutral.
pub async fn decay_reputation(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let touched = CharacterStore::new(ctx.pool)
        .decay_reputation(ctx.config.reputation_decay_step)
        .await?;
    debug!(characters = touched, "Reputation decayed toward neutral");
    Ok(())
}
