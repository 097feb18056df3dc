//! Step 4: work actions (gather and craft).
//!
//! Each action loads its own snapshot, runs the pure resolver with the
//! character's deterministic RNG stream, and applies the effects. Items
//! within a page resolve concurrently in bounded batches; outcomes are
//! merged into the context sequentially so the accumulator never needs
//! a lock. A faulting item fails alone; the batch continues.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use daybreak_db::{ActionStore, CharacterStore, GatherSettlement, ProfessionStore, WorldStore};
use daybreak_resolvers::{
    CraftContext, CraftResolution, GatherContext, GatherResolution, gathering_profession,
    resolve_craft, resolve_gather,
};
use daybreak_rules::RecipeBook;
use daybreak_types::{
    ActionId, ActionOutcome, ActionParams, ActionStatus, ActionType, Biome, CharacterId,
    DailyAction, GameEvent, HungerState, ItemKind, ProfessionKind, Town, TownId,
};
use daybreak_world::abundance;
use futures::future::join_all;
use sqlx::PgPool;
use tracing::warn;

use crate::context::TickContext;
use crate::error::TickError;
use crate::rng::character_rng;

/// The shared read-only inputs every work resolution sees.
#[derive(Clone, Copy)]
struct WorkEnv<'a> {
    pool: &'a PgPool,
    towns: &'a BTreeMap<TownId, Town>,
    recipes: &'a RecipeBook,
    seed: u64,
    day: NaiveDate,
}

/// What one resolved work action asks the context to record.
struct WorkOutcome {
    status: ActionStatus,
    action: ActionOutcome,
    notifications: Vec<String>,
    xp: u32,
    events: Vec<GameEvent>,
}

impl WorkOutcome {
    fn failed(action_type: ActionType, reason: String) -> Self {
        Self {
            status: ActionStatus::Failed,
            action: ActionOutcome::Failed {
                action_type,
                reason,
            },
            notifications: Vec::new(),
            xp: 0,
            events: Vec::new(),
        }
    }
}

/// Run the work step: all gather actions, then all craft actions.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    run_kind(ctx, ActionType::Gather).await?;
    run_kind(ctx, ActionType::Craft).await?;
    Ok(())
}

async fn run_kind(ctx: &mut TickContext<'_>, action_type: ActionType) -> Result<(), TickError> {
    let actions = ActionStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = actions
            .fetch_page(ctx.day, action_type, cursor, ctx.config.page_size)
            .await?;
        let next_cursor = page.next_cursor;

        for chunk in page.items.chunks(ctx.config.batch_size.max(1)) {
            let resolved = {
                let env = WorkEnv {
                    pool: ctx.pool,
                    towns: &ctx.towns,
                    recipes: &ctx.recipes,
                    seed: ctx.config.rng_seed,
                    day: ctx.day,
                };
                let futures = chunk.iter().map(|action| {
                    let action = action.clone();
                    let hunger = ctx.hunger_for(action.character_id);
                    let buffed = ctx.buffed.contains(&action.character_id);
                    async move {
                        let id = action.id;
                        let character = action.character_id;
                        let kind = action.action_type;
                        let outcome = resolve_one(env, hunger, buffed, action).await;
                        (id, character, kind, outcome)
                    }
                });
                join_all(futures).await
            };

            for (id, character, kind, outcome) in resolved {
                match outcome {
                    Ok(outcome) => merge_outcome(ctx, id, character, outcome).await,
                    Err(e) => {
                        warn!(character = %character, error = %e, "Work resolution failed");
                        ctx.record_error("work", &e);
                        ctx.resolve_action(id, ActionStatus::Failed);
                        ctx.results_for(character).action = Some(ActionOutcome::Failed {
                            action_type: kind,
                            reason: "The day's work could not be completed.".to_owned(),
                        });
                    }
                }
            }
        }

        match next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(())
}

async fn merge_outcome(
    ctx: &mut TickContext<'_>,
    id: ActionId,
    character: CharacterId,
    outcome: WorkOutcome,
) {
    ctx.resolve_action(id, outcome.status);
    let results = ctx.results_for(character);
    results.action = Some(outcome.action);
    results.add_xp(outcome.xp);
    for line in outcome.notifications {
        results.notify(line);
    }
    for event in &outcome.events {
        ctx.publisher.publish(event).await;
    }
}

async fn resolve_one(
    env: WorkEnv<'_>,
    hunger: HungerState,
    buffed: bool,
    action: DailyAction,
) -> Result<WorkOutcome, TickError> {
    match action.params.clone() {
        ActionParams::Gather { item } => gather_one(env, hunger, buffed, &action, item).await,
        ActionParams::Craft { recipe_key } => {
            craft_one(env, hunger, &action, &recipe_key).await
        }
        _ => Ok(WorkOutcome::failed(
            action.action_type,
            "The committed action was malformed.".to_owned(),
        )),
    }
}

async fn gather_one(
    env: WorkEnv<'_>,
    hunger: HungerState,
    buffed: bool,
    action: &DailyAction,
    item: ItemKind,
) -> Result<WorkOutcome, TickError> {
    let characters = CharacterStore::new(env.pool);
    let professions = ProfessionStore::new(env.pool);
    let world = WorldStore::new(env.pool);

    let character = characters.get(action.character_id).await?;
    let profession = match gathering_profession(item) {
        Some(kind) => professions.get(character.id, kind).await?,
        None => None,
    };
    let tool = characters.equipped_tool(character.id).await?;
    let resource = world.resource(character.town_id, item).await?;
    let biome = env
        .towns
        .get(&character.town_id)
        .map_or(Biome::Plains, |t| t.biome);

    let snapshot = GatherContext {
        character: &character,
        profession: profession.as_ref(),
        tool: tool.as_ref(),
        resource: resource.as_ref(),
        biome,
        hunger,
        food_buffed: buffed,
    };
    let mut rng = character_rng(env.seed, character.id, env.day);
    let fx = match resolve_gather(&mut rng, &snapshot, item) {
        GatherResolution::Blocked { reason } => {
            return Ok(WorkOutcome::failed(ActionType::Gather, reason));
        }
        GatherResolution::Gathered(fx) => fx,
    };

    let mut notifications = Vec::new();
    let mut events = Vec::new();

    // Inventory upsert, abundance depletion, and tool wear land together
    // or not at all.
    characters
        .settle_gather(&GatherSettlement {
            character: character.id,
            town: character.town_id,
            item: fx.item,
            quality: fx.quality,
            quantity: fx.quantity,
            depletion: abundance::DEPLETION_PER_GATHER,
            tool_remaining: fx.tool_wear.as_ref().map(|w| w.remaining),
        })
        .await?;
    if fx.abundance_warning {
        notifications.push(format!("The local {item:?} supply is running low."));
        events.push(GameEvent::ResourceDepletedWarning {
            town_id: character.town_id,
            item,
            abundance: fx.new_abundance,
        });
    }

    if let Some(wear) = fx.tool_wear {
        if wear.broke {
            notifications.push("Your tool broke from today's work.".to_owned());
            events.push(GameEvent::ToolBroken {
                character_id: character.id,
            });
        }
    }

    let mut xp = fx.character_xp;
    if let Some(kind) = gathering_profession(item) {
        let progress = professions
            .award_xp(character.id, kind, fx.profession_xp)
            .await?;
        xp = xp.saturating_add(fx.profession_xp);
        if progress.levels_gained > 0 {
            notifications.push(format!(
                "Your {kind:?} skill reached level {}.",
                progress.level
            ));
        }
    }

    Ok(WorkOutcome {
        status: ActionStatus::Completed,
        action: ActionOutcome::Succeeded {
            action_type: ActionType::Gather,
            summary: fx.summary,
        },
        notifications,
        xp,
        events,
    })
}

/// Database kind tags of the building kinds that host a profession.
const fn workshop_kinds(profession: ProfessionKind) -> &'static [&'static str] {
    match profession {
        ProfessionKind::Blacksmith => &["forge"],
        ProfessionKind::Alchemist | ProfessionKind::Carpenter | ProfessionKind::Tailor => {
            &["workshop"]
        }
        _ => &[],
    }
}

async fn craft_one(
    env: WorkEnv<'_>,
    hunger: HungerState,
    action: &DailyAction,
    recipe_key: &str,
) -> Result<WorkOutcome, TickError> {
    let characters = CharacterStore::new(env.pool);
    let professions = ProfessionStore::new(env.pool);
    let world = WorldStore::new(env.pool);

    let character = characters.get(action.character_id).await?;

    let recipe = env.recipes.get(recipe_key);
    let profession = match recipe {
        Some(r) => professions.get(character.id, r.profession).await?,
        None => None,
    };
    let workshop = match recipe {
        Some(r) => {
            let kinds = workshop_kinds(r.profession);
            if kinds.is_empty() {
                None
            } else {
                world.best_workshop(character.town_id, kinds).await?
            }
        }
        None => None,
    };
    let tool = characters.equipped_tool(character.id).await?;
    let inventory = characters.inventory(character.id).await?;

    let snapshot = CraftContext {
        character: &character,
        profession: profession.as_ref(),
        tool: tool.as_ref(),
        workshop: workshop.as_ref(),
        inventory: &inventory,
        hunger,
    };
    let mut rng = character_rng(env.seed, character.id, env.day);
    let resolution =
        resolve_craft(&mut rng, &snapshot, env.recipes, recipe_key).map_err(|e| {
            TickError::Resolver {
                character: character.id,
                source: e,
            }
        })?;

    let fx = match resolution {
        CraftResolution::Blocked { reason } => {
            return Ok(WorkOutcome::failed(ActionType::Craft, reason));
        }
        CraftResolution::Crafted(fx) => fx,
    };

    let draws: Vec<_> = fx
        .consumed
        .iter()
        .map(|d| (d.stack_id, d.quantity))
        .collect();
    characters
        .consume_and_create(character.id, &draws, fx.output, fx.quality)
        .await?;

    let mut notifications = Vec::new();
    let mut events = Vec::new();
    if let Some(wear) = fx.tool_wear {
        characters
            .apply_tool_wear(character.id, wear.remaining)
            .await?;
        if wear.broke {
            notifications.push("Your tool broke from today's work.".to_owned());
            events.push(GameEvent::ToolBroken {
                character_id: character.id,
            });
        }
    }

    let mut xp = fx.character_xp;
    if let Some(r) = recipe {
        let progress = professions
            .award_xp(character.id, r.profession, fx.profession_xp)
            .await?;
        xp = xp.saturating_add(fx.profession_xp);
        if progress.levels_gained > 0 {
            notifications.push(format!(
                "Your {:?} skill reached level {}.",
                r.profession, progress.level
            ));
        }
    }

    Ok(WorkOutcome {
        status: ActionStatus::Completed,
        action: ActionOutcome::Succeeded {
            action_type: ActionType::Craft,
            summary: fx.summary,
        },
        notifications,
        xp,
        events,
    })
}
