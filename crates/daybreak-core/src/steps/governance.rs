//! Step 6: governance resolution.
//!
//! Three concerns in one pass: freshly committed law proposals enter the
//! voting ledger, laws whose deadlines arrived transition (pass, reject,
//! or lapse), and impeachment motions whose windows closed are tallied.
//! A passed impeachment vacates the office immediately.

use chrono::Days;
use daybreak_db::{ActionStore, GovernanceStore, WorldStore};
use daybreak_types::{
    ActionOutcome, ActionParams, ActionStatus, ActionType, DailyAction, Law, LawId, LawStatus,
    Seat,
};
use daybreak_world::law::{resolve_impeachment, resolve_law, vacates_office};
use tracing::{info, warn};

use crate::context::TickContext;
use crate::error::TickError;

/// Days a proposed law stays open for voting.
pub const LAW_VOTING_DAYS: u64 = 3;

/// Run the governance step.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    register_proposals(ctx).await?;
    settle_laws(ctx).await?;
    settle_impeachments(ctx).await?;
    Ok(())
}

async fn register_proposals(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let actions = ActionStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = actions
            .fetch_page(ctx.day, ActionType::ProposeLaw, cursor, ctx.config.page_size)
            .await?;
        for action in &page.items {
            if let Err(e) = register_one(ctx, action).await {
                warn!(character = %action.character_id, error = %e, "Law proposal failed");
                ctx.record_error("governance", &e);
                ctx.resolve_action(action.id, ActionStatus::Failed);
                ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
                    action_type: ActionType::ProposeLaw,
                    reason: "The proposal could not be filed.".to_owned(),
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

async fn register_one(
    ctx: &mut TickContext<'_>,
    action: &DailyAction,
) -> Result<(), TickError> {
    let ActionParams::ProposeLaw {
        title,
        duration_days,
    } = &action.params
    else {
        ctx.resolve_action(action.id, ActionStatus::Failed);
        ctx.results_for(action.character_id).action = Some(ActionOutcome::Failed {
            action_type: ActionType::ProposeLaw,
            reason: "The committed action was malformed.".to_owned(),
        });
        return Ok(());
    };

    let character = daybreak_db::CharacterStore::new(ctx.pool)
        .get(action.character_id)
        .await?;
    let vote_expires_on = ctx
        .day
        .checked_add_days(Days::new(LAW_VOTING_DAYS))
        .unwrap_or(ctx.day);
    let active_expires_on = vote_expires_on
        .checked_add_days(Days::new(u64::from(*duration_days)))
        .unwrap_or(vote_expires_on);

    let law = Law {
        id: LawId::new(),
        town_id: character.town_id,
        proposer: character.id,
        title: title.clone(),
        votes_for: 0,
        votes_against: 0,
        status: LawStatus::Proposed,
        vote_expires_on,
        active_expires_on,
    };
    GovernanceStore::new(ctx.pool).propose_law(&law).await?;

    ctx.resolve_action(action.id, ActionStatus::Completed);
    let results = ctx.results_for(character.id);
    results.action = Some(ActionOutcome::Succeeded {
        action_type: ActionType::ProposeLaw,
        summary: format!("Proposed \"{title}\"; voting closes in {LAW_VOTING_DAYS} days."),
    });
    Ok(())
}

async fn settle_laws(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let governance = GovernanceStore::new(ctx.pool);
    let laws = governance.due_laws(ctx.day).await?;
    for law in laws {
        let Some(status) = resolve_law(&law, ctx.day) else {
            continue;
        };
        if let Err(e) = governance.set_law_status(law.id, status).await {
            warn!(law = %law.id, error = %e, "Law transition failed");
            ctx.record_error("governance", &e);
            continue;
        }
        info!(law = %law.id, status = ?status, "Law transitioned");
        let line = match status {
            LawStatus::Active => format!("Your law \"{}\" passed and is now in force.", law.title),
            LawStatus::Rejected => format!("Your law \"{}\" was voted down.", law.title),
            LawStatus::Expired => format!("Your law \"{}\" has run its course.", law.title),
            LawStatus::Proposed => continue,
        };
        ctx.results_for(law.proposer).notify(line);
    }
    Ok(())
}

async fn settle_impeachments(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let governance = GovernanceStore::new(ctx.pool);
    let world = WorldStore::new(ctx.pool);
    let motions = governance.due_impeachments(ctx.day).await?;
    for motion in motions {
        let Some(status) = resolve_impeachment(&motion, ctx.day) else {
            continue;
        };
        if let Err(e) = governance.set_impeachment_status(motion.id, status).await {
            warn!(motion = %motion.id, error = %e, "Impeachment transition failed");
            ctx.record_error("governance", &e);
            continue;
        }
        if vacates_office(status) {
            match motion.seat {
                Seat::Town(town) => world.set_mayor(town, None).await?,
                Seat::Kingdom(kingdom) => world.set_ruler(kingdom, None).await?,
            }
            info!(motion = %motion.id, target = %motion.target, "Office vacated by impeachment");
            ctx.results_for(motion.target)
                .notify("You have been removed from office by impeachment.");
            ctx.note_world_event(motion.target, "An officeholder was impeached and removed.");
        } else {
            ctx.results_for(motion.target)
                .notify("An impeachment motion against you failed.");
        }
    }
    Ok(())
}
