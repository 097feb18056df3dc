//! Step 11: world-event fold-in.
//!
//! Steps that produce town-visible happenings queue one-line notes
//! against the characters they touch; this step folds the queue into
//! each character's daily report.

use std::mem;

use crate::context::TickContext;
use crate::error::TickError;

/// Fold queued world-event notes into the per-character results.
pub fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let notes = mem::take(&mut ctx.world_notes);
    for (character, line) in notes {
        ctx.results_for(character).world_events.push(line);
    }
    Ok(())
}
