//! Step 8: elections and diplomacy.
//!
//! Election phases are reconciled to the calendar: nominations, then
//! voting, then completion. Completing an election tallies the field,
//! installs the winner in the seat, and the follow-up sweep opens the
//! next term's election for every seat left without an open one.

use daybreak_db::{GovernanceStore, WorldStore};
use daybreak_types::{Election, ElectionPhase, GameEvent, Seat};
use daybreak_world::election::{next_phase, tally};
use tracing::{info, warn};

use crate::context::TickContext;
use crate::error::TickError;

/// Run the election step.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let governance = GovernanceStore::new(ctx.pool);

    let open = governance.open_elections().await?;
    for election in open {
        if let Err(e) = advance_one(ctx, &election).await {
            warn!(election = %election.id, error = %e, "Election transition failed");
            ctx.record_error("elections", &e);
        }
    }

    // Every seat keeps a standing election; open the next term where
    // the previous one completed (or none was ever held).
    let vacant = governance.seats_without_open_election().await?;
    for (seat, latest_term) in vacant {
        let term = latest_term.saturating_add(1);
        let id = governance.spawn_election(seat, term, ctx.day).await?;
        info!(election = %id, ?seat, term, "Election opened");
    }
    Ok(())
}

async fn advance_one(ctx: &mut TickContext<'_>, election: &Election) -> Result<(), TickError> {
    let governance = GovernanceStore::new(ctx.pool);
    let candidates = governance.candidates(election.id).await?;

    let Some(phase) = next_phase(election, ctx.day, candidates.len()) else {
        return Ok(());
    };

    if phase != ElectionPhase::Completed {
        governance.set_phase(election.id, phase).await?;
        info!(election = %election.id, phase = ?phase, "Election advanced");
        return Ok(());
    }

    let winner = tally(&candidates);
    governance.complete_election(election.id, winner).await?;

    if let Some(winner) = winner {
        let world = WorldStore::new(ctx.pool);
        let office = match election.seat {
            Seat::Town(town) => {
                world.set_mayor(town, Some(winner)).await?;
                "mayor"
            }
            Seat::Kingdom(kingdom) => {
                world.set_ruler(kingdom, Some(winner)).await?;
                "ruler"
            }
        };
        info!(election = %election.id, winner = %winner, office, "Election completed");
        ctx.results_for(winner)
            .notify(format!("You won the election and now serve as {office}."));
        ctx.note_world_event(winner, "An election concluded with a new officeholder.");
    } else {
        info!(election = %election.id, "Election completed with no candidates; seat unchanged");
    }

    ctx.publisher
        .publish(&GameEvent::ElectionCompleted {
            election_id: election.id,
            winner,
        })
        .await;
    Ok(())
}
