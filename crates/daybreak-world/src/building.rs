//! Building upkeep: degradation, property tax, delinquency, seizure.
//!
//! All functions here are decisions; the economy step debits, credits,
//! and transfers ownership through the storage layer according to the
//! returned value.

use chrono::NaiveDate;
use daybreak_types::{Building, BuildingKind};
use rust_decimal::Decimal;

use crate::error::WorldError;

/// Condition lost per tick.
pub const DAILY_DECAY: u32 = 1;

/// At or below this condition the owner gets a low-condition warning.
pub const LOW_CONDITION: u32 = 25;

/// At or below this condition the building is condemned.
pub const CONDEMNED_CONDITION: u32 = 10;

/// Accrued delinquent days at which ownership transfers to the mayor.
pub const SEIZURE_DELINQUENT_DAYS: u32 = 7;

/// The untaxed base levy per building kind, per tick.
pub fn base_tax(kind: BuildingKind) -> Decimal {
    match kind {
        BuildingKind::Cottage => Decimal::from(2u32),
        BuildingKind::Warehouse => Decimal::from(4u32),
        BuildingKind::Workshop => Decimal::from(5u32),
        BuildingKind::Forge => Decimal::from(6u32),
        BuildingKind::Inn => Decimal::from(8u32),
        BuildingKind::Manor => Decimal::from(15u32),
    }
}

/// The property tax owed on a building: `base(kind) × level × (1 + rate)`.
pub fn property_tax(
    kind: BuildingKind,
    level: u32,
    town_rate_pct: u32,
) -> Result<Decimal, WorldError> {
    let overflow = || WorldError::ArithmeticOverflow {
        context: String::from("property tax"),
    };
    let rate = Decimal::from(town_rate_pct.saturating_add(100))
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or_else(overflow)?;
    base_tax(kind)
        .checked_mul(Decimal::from(level.max(1)))
        .and_then(|levy| levy.checked_mul(rate))
        .ok_or_else(overflow)
}

/// Outcome of one tick of structural decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decay {
    /// Condition after decay, clamped at zero.
    pub condition: u32,
    /// Whether decay pushed the building to the low-condition line.
    pub crossed_low: bool,
    /// Whether decay pushed the building to the condemnation line.
    pub condemned: bool,
}

/// Apply one tick of decay to a condition gauge.
pub const fn decay(condition: u32) -> Decay {
    let after = condition.saturating_sub(DAILY_DECAY);
    Decay {
        condition: after,
        crossed_low: condition > LOW_CONDITION && after <= LOW_CONDITION,
        condemned: condition > CONDEMNED_CONDITION && after <= CONDEMNED_CONDITION,
    }
}

/// The economy step's verdict on one building's tax assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxDecision {
    /// Debit the owner, credit the treasury, clear any delinquency.
    Paid {
        /// The amount owed and paid.
        amount: Decimal,
    },
    /// The owner cannot pay; record one more delinquent day.
    Delinquent {
        /// The first day of the current arrears streak.
        since: NaiveDate,
        /// Accrued delinquent days including today.
        days: u32,
    },
    /// Arrears reached the seizure line; transfer ownership to the
    /// town's mayor. A no-op when the town has no mayor.
    Seize {
        /// Delinquent days accrued at the moment of seizure.
        days: u32,
    },
    /// Unowned town property is never assessed.
    Exempt,
}

/// Assess one building's property tax against its owner's liquid gold.
pub fn assess_tax(
    building: &Building,
    owner_gold: Option<Decimal>,
    town_rate_pct: u32,
    today: NaiveDate,
) -> Result<TaxDecision, WorldError> {
    let Some(gold) = owner_gold else {
        return Ok(TaxDecision::Exempt);
    };

    let amount = property_tax(building.kind, building.level, town_rate_pct)?;
    if gold >= amount {
        return Ok(TaxDecision::Paid { amount });
    }

    let days = building.delinquent_days.saturating_add(1);
    if days >= SEIZURE_DELINQUENT_DAYS {
        return Ok(TaxDecision::Seize { days });
    }
    Ok(TaxDecision::Delinquent {
        since: building.delinquent_since.unwrap_or(today),
        days,
    })
}

#[cfg(test)]
mod tests {
    use daybreak_types::{BuildingId, TownId};

    use super::*;

    fn sample_building(delinquent_days: u32) -> Building {
        Building {
            id: BuildingId::new(),
            town_id: TownId::new(),
            owner: None,
            kind: BuildingKind::Workshop,
            level: 2,
            condition: 80,
            delinquent_since: None,
            delinquent_days,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
    }

    #[test]
    fn tax_scales_with_level_and_rate() {
        // Workshop base 5, level 2, +10% town rate: 5 * 2 * 1.10 = 11.
        let tax = property_tax(BuildingKind::Workshop, 2, 10).ok();
        assert_eq!(tax, Some(Decimal::new(110, 1)));
        // Zero rate leaves the base levy untouched.
        let flat = property_tax(BuildingKind::Cottage, 1, 0).ok();
        assert_eq!(flat, Some(Decimal::from(2u32)));
    }

    #[test]
    fn affordable_tax_is_paid() {
        let b = sample_building(3);
        let decision = assess_tax(&b, Some(Decimal::from(100u32)), 0, day("2026-08-23")).ok();
        assert_eq!(
            decision,
            Some(TaxDecision::Paid {
                amount: Decimal::from(10u32)
            })
        );
    }

    #[test]
    fn arrears_accrue_until_seizure() {
        let broke = Some(Decimal::ZERO);
        let today = day("2026-08-23");

        let b = sample_building(0);
        let first = assess_tax(&b, broke, 0, today).ok();
        assert_eq!(
            first,
            Some(TaxDecision::Delinquent {
                since: today,
                days: 1
            })
        );

        let b = sample_building(6);
        let seventh = assess_tax(&b, broke, 0, today).ok();
        assert_eq!(seventh, Some(TaxDecision::Seize { days: 7 }));
    }

    #[test]
    fn existing_streak_keeps_its_start_date() {
        let started = day("2026-08-20");
        let mut b = sample_building(2);
        b.delinquent_since = Some(started);
        let decision = assess_tax(&b, Some(Decimal::ZERO), 0, day("2026-08-23")).ok();
        assert_eq!(
            decision,
            Some(TaxDecision::Delinquent {
                since: started,
                days: 3
            })
        );
    }

    #[test]
    fn unowned_buildings_are_exempt() {
        let b = sample_building(0);
        let decision = assess_tax(&b, None, 10, day("2026-08-23")).ok();
        assert_eq!(decision, Some(TaxDecision::Exempt));
    }

    #[test]
    fn decay_thresholds_fire_once() {
        assert_eq!(
            decay(26),
            Decay {
                condition: 25,
                crossed_low: true,
                condemned: false
            }
        );
        assert!(!decay(25).crossed_low);
        assert!(decay(11).condemned);
        assert!(!decay(10).condemned);
        assert_eq!(decay(0).condition, 0);
    }
}
