//! The mutable state threaded through every tick step.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use daybreak_events::EventPublisher;
use daybreak_rules::RecipeBook;
use daybreak_types::{
    ActionId, ActionStatus, CharacterId, CharacterResults, HungerState, Town, TownId,
};
use sqlx::PgPool;

use crate::config::TickConfig;

/// Everything one tick invocation reads and accumulates.
///
/// Created by the orchestrator, passed mutably through the step
/// pipeline, and consumed by results delivery and the summary.
pub struct TickContext<'a> {
    /// The shared connection pool; steps build stores from it.
    pub pool: &'a PgPool,
    /// Best-effort event channel.
    pub publisher: &'a EventPublisher,
    /// Tuning knobs.
    pub config: &'a TickConfig,
    /// Static crafting balance tables.
    pub recipes: RecipeBook,
    /// The game day being resolved.
    pub day: NaiveDate,
    /// All towns, loaded once at tick start (tens of rows).
    pub towns: BTreeMap<TownId, Town>,
    /// Hunger states computed by the food step, read by later steps.
    pub hunger: BTreeMap<CharacterId, HungerState>,
    /// Characters whose meal buffed today's work.
    pub buffed: BTreeSet<CharacterId>,
    /// The per-character results accumulator, flushed by delivery.
    pub results: BTreeMap<CharacterId, CharacterResults>,
    /// Action-status transitions to apply at delivery.
    pub resolutions: Vec<(ActionId, ActionStatus)>,
    /// World events awaiting fold-in, keyed to the characters they touch.
    pub world_notes: Vec<(CharacterId, String)>,
    /// Step- and item-level errors (the tick still completes).
    pub errors: Vec<String>,
}

impl<'a> TickContext<'a> {
    /// Create an empty context for one tick invocation.
    pub fn new(
        pool: &'a PgPool,
        publisher: &'a EventPublisher,
        config: &'a TickConfig,
        day: NaiveDate,
    ) -> Self {
        Self {
            pool,
            publisher,
            config,
            recipes: RecipeBook::standard(),
            day,
            towns: BTreeMap::new(),
            hunger: BTreeMap::new(),
            buffed: BTreeSet::new(),
            results: BTreeMap::new(),
            resolutions: Vec::new(),
            world_notes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// The results accumulator for a character, created on first touch.
    pub fn results_for(&mut self, character: CharacterId) -> &mut CharacterResults {
        self.results.entry(character).or_default()
    }

    /// The cached hunger state for a character; characters created after
    /// the food step ran default to `Sated`.
    pub fn hunger_for(&self, character: CharacterId) -> HungerState {
        self.hunger
            .get(&character)
            .copied()
            .unwrap_or(HungerState::Sated)
    }

    /// Queue an action-status transition for delivery.
    pub fn resolve_action(&mut self, action: ActionId, status: ActionStatus) {
        self.resolutions.push((action, status));
    }

    /// Queue a world event line for a character's report.
    pub fn note_world_event(&mut self, character: CharacterId, line: impl Into<String>) {
        self.world_notes.push((character, line.into()));
    }

    /// Record a recovered per-item failure.
    pub fn record_error(&mut self, context: &str, error: impl std::fmt::Display) {
        self.errors.push(format!("{context}: {error}"));
    }
}
