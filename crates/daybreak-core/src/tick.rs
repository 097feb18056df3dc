//! The nightly tick orchestrator.
//!
//! Steps run in a fixed order so every invariant that later steps rely
//! on (hunger caches, action statuses, installed officeholders) has
//! been established by the time they read it. A failing step is logged
//! and recorded; the pipeline always reaches results delivery.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use daybreak_db::{ActionStore, ReportStore, WorldStore};
use daybreak_events::EventPublisher;
use daybreak_types::TickSummary;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::config::TickConfig;
use crate::context::TickContext;
use crate::error::TickError;
use crate::steps;

/// Log a finished step and record its failure, if any.
fn finish_step(
    ctx: &mut TickContext<'_>,
    name: &str,
    started: Instant,
    result: Result<(), TickError>,
) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(()) => debug!(step = name, elapsed_ms, "Step finished"),
        Err(e) => {
            warn!(step = name, elapsed_ms, error = %e, "Step failed; tick continues");
            ctx.record_error(name, &e);
        }
    }
}

macro_rules! step {
    ($ctx:expr, $name:literal, $call:expr) => {{
        let started = Instant::now();
        let result = $call.await;
        finish_step($ctx, $name, started, result);
    }};
}

/// Resolve one game day.
///
/// Loads the world, runs every pipeline step in order, persists the
/// operational summary, and returns it.
///
/// # Errors
///
/// Returns [`TickError::Db`] only when the tick cannot start (towns
/// fail to load) or its summary cannot be persisted; step failures are
/// recorded in the summary instead.
pub async fn run_tick(
    pool: &PgPool,
    publisher: &EventPublisher,
    config: &TickConfig,
    day: NaiveDate,
) -> Result<TickSummary, TickError> {
    let tick_started = Instant::now();
    info!(%day, "Tick started");

    let mut ctx = TickContext::new(pool, publisher, config, day);

    // Several steps read town rows (biomes, tax rates, mayors); load
    // them once. The world holds tens of towns.
    let towns = WorldStore::new(pool).towns().await?;
    ctx.towns = towns.into_iter().map(|t| (t.id, t)).collect();

    step!(&mut ctx, "food", steps::food::run(&mut ctx));
    step!(&mut ctx, "travel", steps::travel::run(&mut ctx));
    step!(&mut ctx, "encounters", steps::encounters::run(&mut ctx));
    step!(&mut ctx, "work", steps::work::run(&mut ctx));
    step!(&mut ctx, "service", steps::service::run(&mut ctx));
    step!(&mut ctx, "governance", steps::governance::run(&mut ctx));
    step!(&mut ctx, "economy", steps::economy::run(&mut ctx));
    step!(&mut ctx, "elections", steps::elections::run(&mut ctx));
    step!(&mut ctx, "rest", steps::rest::run(&mut ctx));
    step!(&mut ctx, "quests", steps::quests::run(&mut ctx));

    {
        let started = Instant::now();
        let result = steps::world_events::run(&mut ctx);
        finish_step(&mut ctx, "world_events", started, result);
    }

    step!(&mut ctx, "delivery", steps::delivery::run(&mut ctx));
    step!(&mut ctx, "npc_income", steps::upkeep::npc_income(&mut ctx));
    step!(&mut ctx, "loans", steps::upkeep::sweep_loans(&mut ctx));
    step!(&mut ctx, "reputation", steps::upkeep::decay_reputation(&mut ctx));

    // Loan settlements append notices after delivery ran; flush the
    // reports once more so nothing written post-delivery is lost.
    step!(&mut ctx, "late_flush", steps::delivery::flush_reports(&mut ctx));

    let action_counts: BTreeMap<_, _> = match ActionStore::new(pool).counts_for_day(day).await {
        Ok(counts) => counts.into_iter().collect(),
        Err(e) => {
            warn!(error = %e, "Action counts unavailable for the summary");
            ctx.record_error("summary", &e);
            BTreeMap::new()
        }
    };

    let summary = TickSummary {
        day,
        characters_processed: u32::try_from(ctx.results.len()).unwrap_or(u32::MAX),
        action_counts,
        duration_ms: u64::try_from(tick_started.elapsed().as_millis()).unwrap_or(u64::MAX),
        errors: ctx.errors.clone(),
    };
    ReportStore::new(pool).insert_summary(&summary).await?;

    info!(
        %day,
        characters = summary.characters_processed,
        duration_ms = summary.duration_ms,
        errors = summary.errors.len(),
        "Tick complete"
    );
    Ok(summary)
}
