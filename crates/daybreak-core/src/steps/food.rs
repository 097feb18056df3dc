//! Step 1: food and consumption.
//!
//! Every character pays the daily satiety cost, eats from inventory if
//! anything edible is there (cooked meals first, then raw food), and
//! gets their hunger state cached for every later step. Revenants do
//! not eat; their binding gauge simply fades.

use daybreak_db::CharacterStore;
use daybreak_rules::hunger;
use daybreak_types::{Character, FoodOutcome, HungerState, ItemKind, Race};
use tracing::warn;

use crate::context::TickContext;
use crate::error::TickError;

/// Run the food step over every character, paginated.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let store = CharacterStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = store.fetch_page(cursor, ctx.config.page_size).await?;
        for character in &page.items {
            if let Err(e) = feed_one(ctx, character).await {
                warn!(character = %character.id, error = %e, "Food step failed for character");
                ctx.record_error("food", &e);
                ctx.results_for(character.id)
                    .notify("Something went wrong at mealtime today.");
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(())
}

/// A human-readable name for what was eaten.
const fn meal_name(item: ItemKind) -> &'static str {
    match item {
        ItemKind::Meal => "a cooked meal",
        ItemKind::Fish => "fresh fish",
        ItemKind::Herbs => "foraged herbs",
        _ => "something edible",
    }
}

/// Whether an item can be eaten raw.
const fn is_raw_food(item: ItemKind) -> bool {
    matches!(item, ItemKind::Fish | ItemKind::Herbs)
}

async fn feed_one(
    ctx: &mut TickContext<'_>,
    character: &Character,
) -> Result<(), daybreak_db::DbError> {
    let store = CharacterStore::new(ctx.pool);
    let mut satiety = character.satiety.saturating_sub(hunger::DAILY_SATIETY_COST);

    let outcome = if character.race == Race::Revenant {
        FoodOutcome::Faded
    } else {
        let inventory = store.inventory(character.id).await?;
        let pick = inventory
            .iter()
            .find(|s| s.item == ItemKind::Meal && s.quantity > 0)
            .or_else(|| {
                inventory
                    .iter()
                    .find(|s| is_raw_food(s.item) && s.quantity > 0)
            });
        match pick {
            Some(stack) => {
                store.remove_from_stack(stack.id, 1).await?;
                satiety = satiety.saturating_add(hunger::MEAL_SATIETY_GAIN).min(100);
                let buffed = stack.item == ItemKind::Meal;
                if buffed {
                    ctx.buffed.insert(character.id);
                }
                FoodOutcome::Ate {
                    meal: meal_name(stack.item).to_owned(),
                    buffed,
                }
            }
            None => FoodOutcome::WentHungry,
        }
    };

    store.set_satiety(character.id, satiety).await?;
    let state = hunger::hunger_for(character.race, satiety);
    ctx.hunger.insert(character.id, state);

    let results = ctx.results_for(character.id);
    results.food = Some(outcome);
    if state == HungerState::Incapacitated {
        results.notify("You are too weak from hunger to do anything but rest.");
    }
    Ok(())
}
