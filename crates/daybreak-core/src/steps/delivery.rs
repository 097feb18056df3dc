//! Step 12: results delivery.
//!
//! The accumulated per-character results become daily report rows,
//! upserted on (character, day) so re-delivery is idempotent. Resolved
//! action statuses are flushed in one batch, and the tick-complete
//! event tells listeners the day's reports are readable.
//!
//! Upkeep steps that run after delivery (loan settlements) still append
//! notices to the accumulator; the orchestrator calls [`flush_reports`]
//! once more at the end of the tick to pick those up.

use std::mem;

use daybreak_db::{ActionStore, ReportStore};
use daybreak_types::{ActionOutcome, DailyReport, GameEvent};
use tracing::info;

use crate::context::TickContext;
use crate::error::TickError;

/// Upsert every accumulated result as a daily report row.
///
/// Characters nothing acted on get an idle outcome so their report is
/// never empty.
pub async fn flush_reports(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    for results in ctx.results.values_mut() {
        if results.action.is_none() {
            results.action = Some(ActionOutcome::Idled);
        }
    }

    let reports: Vec<DailyReport> = ctx
        .results
        .iter()
        .map(|(&character_id, results)| DailyReport {
            character_id,
            day: ctx.day,
            results: results.clone(),
        })
        .collect();
    ReportStore::new(ctx.pool)
        .with_batch_size(ctx.config.batch_size.max(1))
        .upsert_reports(&reports)
        .await?;
    Ok(())
}

/// Flush results, action statuses, and the tick-complete event.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    flush_reports(ctx).await?;

    let resolutions = mem::take(&mut ctx.resolutions);
    ActionStore::new(ctx.pool).mark_resolved(&resolutions).await?;

    let characters_processed = u32::try_from(ctx.results.len()).unwrap_or(u32::MAX);
    ctx.publisher
        .publish(&GameEvent::TickComplete {
            day: ctx.day,
            characters_processed,
        })
        .await;
    info!(
        day = %ctx.day,
        reports = ctx.results.len(),
        resolutions = resolutions.len(),
        "Results delivered"
    );
    Ok(())
}
