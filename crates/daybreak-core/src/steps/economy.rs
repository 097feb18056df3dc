//! Step 7: the economy cycle.
//!
//! Four sweeps in a fixed order: trade tax collection into town
//! treasuries, building decay and property tax over all buildings,
//! resource regeneration, and caravan arrival notifications.

use chrono::Utc;
use daybreak_db::{CharacterStore, WorldStore};
use daybreak_types::{Building, GameEvent, Town};
use daybreak_world::building::{TaxDecision, assess_tax, decay};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::context::TickContext;
use crate::error::TickError;

/// Run the economy step.
pub async fn run(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    collect_trade_tax(ctx).await?;
    sweep_buildings(ctx).await?;

    let regenerated = WorldStore::new(ctx.pool).regenerate_resources().await?;
    debug!(nodes = regenerated, "Resource nodes regenerated");

    notify_caravans(ctx).await?;
    Ok(())
}

/// Tax the trade volume each town saw since its watermark and advance
/// the watermark so the same trades are never taxed twice.
async fn collect_trade_tax(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let world = WorldStore::new(ctx.pool);
    let towns: Vec<Town> = ctx.towns.values().cloned().collect();
    for town in towns {
        let volume = match world
            .untaxed_trade_volume(town.id, town.trade_tax_watermark)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                warn!(town = %town.id, error = %e, "Trade tax query failed");
                ctx.record_error("economy", &e);
                continue;
            }
        };
        let Some((volume, newest)) = volume else {
            continue;
        };

        let tax = volume
            .checked_mul(Decimal::from(town.tax_rate_pct))
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO);
        if tax > Decimal::ZERO {
            world.credit_treasury(town.id, tax).await?;
            info!(town = %town.id, %tax, "Trade tax collected");
        }
        world.advance_watermark(town.id, newest).await?;
    }
    Ok(())
}

async fn sweep_buildings(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let world = WorldStore::new(ctx.pool);
    let mut cursor = None;
    loop {
        let page = world.buildings_page(cursor, ctx.config.page_size).await?;
        for building in &page.items {
            if let Err(e) = sweep_one(ctx, building).await {
                warn!(building = %building.id, error = %e, "Building sweep failed");
                ctx.record_error("economy", &e);
            }
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(())
}

async fn sweep_one(ctx: &mut TickContext<'_>, building: &Building) -> Result<(), TickError> {
    let world = WorldStore::new(ctx.pool);
    let characters = CharacterStore::new(ctx.pool);

    // Structural decay first, so condition events precede tax ones.
    let wear = decay(building.condition);
    world.set_condition(building.id, wear.condition).await?;
    if wear.crossed_low {
        ctx.publisher
            .publish(&GameEvent::BuildingConditionLow {
                building_id: building.id,
                condition: wear.condition,
            })
            .await;
        if let Some(owner) = building.owner {
            ctx.results_for(owner)
                .notify("One of your buildings is falling into disrepair.");
        }
    }
    if wear.condemned {
        ctx.publisher
            .publish(&GameEvent::BuildingCondemned {
                building_id: building.id,
            })
            .await;
        if let Some(owner) = building.owner {
            ctx.results_for(owner)
                .notify("One of your buildings has been condemned.");
        }
    }

    let town_rate = ctx
        .towns
        .get(&building.town_id)
        .map_or(0, |t| t.tax_rate_pct);
    let owner_gold = match building.owner {
        Some(owner) => Some(characters.get(owner).await?.gold),
        None => None,
    };

    match assess_tax(building, owner_gold, town_rate, ctx.day)? {
        TaxDecision::Exempt => {}
        TaxDecision::Paid { amount } => {
            let Some(owner) = building.owner else {
                return Ok(());
            };
            world
                .record_tax_paid(building.id, owner, building.town_id, amount)
                .await?;
            ctx.publisher
                .publish(&GameEvent::TaxDue {
                    building_id: building.id,
                    owner,
                    amount,
                })
                .await;
            let results = ctx.results_for(owner);
            results.add_gold(amount.saturating_mul(Decimal::NEGATIVE_ONE));
            results.notify(format!("Paid {amount} gold in property tax."));
        }
        TaxDecision::Delinquent { since, days } => {
            let Some(owner) = building.owner else {
                return Ok(());
            };
            world.record_delinquency(building.id, since, days).await?;
            ctx.publisher
                .publish(&GameEvent::TaxDelinquent {
                    building_id: building.id,
                    owner,
                    days,
                })
                .await;
            ctx.results_for(owner).notify(format!(
                "You could not cover your property tax ({days} days in arrears)."
            ));
        }
        TaxDecision::Seize { days } => {
            let Some(owner) = building.owner else {
                return Ok(());
            };
            let mayor = ctx.towns.get(&building.town_id).and_then(|t| t.mayor);
            // Without a mayor there is nobody to seize for; the arrears
            // streak keeps counting.
            let Some(mayor) = mayor else {
                let since = building.delinquent_since.unwrap_or(ctx.day);
                world.record_delinquency(building.id, since, days).await?;
                return Ok(());
            };
            world.seize_building(building.id, mayor).await?;
            ctx.publisher
                .publish(&GameEvent::BuildingSeized {
                    building_id: building.id,
                    previous_owner: owner,
                    new_owner: mayor,
                })
                .await;
            info!(building = %building.id, owner = %owner, mayor = %mayor, "Building seized");
            ctx.results_for(owner)
                .notify("A building of yours was seized for unpaid taxes.");
            ctx.note_world_event(owner, "A property was seized for tax arrears.");
        }
    }
    Ok(())
}

async fn notify_caravans(ctx: &mut TickContext<'_>) -> Result<(), TickError> {
    let world = WorldStore::new(ctx.pool);
    let caravans = world.arrived_caravans(Utc::now()).await?;
    for caravan in caravans {
        let destination = ctx
            .towns
            .get(&caravan.destination)
            .map_or_else(|| "its destination".to_owned(), |t| t.name.clone());
        world.mark_caravan_notified(caravan.id).await?;
        ctx.publisher
            .publish(&GameEvent::CaravanArrived {
                caravan_id: caravan.id,
                owner: caravan.owner,
            })
            .await;
        ctx.results_for(caravan.owner)
            .notify(format!("Your caravan has arrived at {destination}."));
    }
    Ok(())
}
