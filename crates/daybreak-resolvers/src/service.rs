//! The service-income resolver.
//!
//! Characters practicing a service profession earn a level-scaled daily
//! wage regardless of their committed action. Player wages are credited
//! to the character; NPC wages go to the town treasury (the income step
//! decides which, this resolver only prices the day's work).

use daybreak_types::{ProfessionCategory, ProfessionKind};
use rust_decimal::Decimal;

use crate::error::ResolverError;

/// Gold earned per profession level on top of the base wage.
const WAGE_PER_LEVEL: Decimal = Decimal::from_parts(2, 0, 0, false, 1); // 0.2

/// The flat daily base wage for a service profession, if it is one.
fn base_wage(kind: ProfessionKind) -> Option<Decimal> {
    match kind {
        ProfessionKind::Innkeeper => Some(Decimal::from(3u32)),
        ProfessionKind::Healer => Some(Decimal::from(4u32)),
        _ => None,
    }
}

/// The daily wage for one service profession at one level.
///
/// `None` for non-service professions.
pub fn daily_wage(kind: ProfessionKind, level: u32) -> Result<Option<Decimal>, ResolverError> {
    debug_assert_eq!(
        base_wage(kind).is_some(),
        kind.category() == ProfessionCategory::Service
    );
    let Some(base) = base_wage(kind) else {
        return Ok(None);
    };
    let overflow = || ResolverError::ArithmeticOverflow {
        context: String::from("service wage"),
    };
    let scaled = WAGE_PER_LEVEL
        .checked_mul(Decimal::from(level))
        .ok_or_else(overflow)?;
    let wage = base.checked_add(scaled).ok_or_else(overflow)?;
    Ok(Some(wage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_service_professions_earn_nothing() {
        assert_eq!(daily_wage(ProfessionKind::Miner, 50).ok(), Some(None));
        assert_eq!(daily_wage(ProfessionKind::Blacksmith, 50).ok(), Some(None));
    }

    #[test]
    fn wage_scales_with_level() {
        // Innkeeper base 3 + 0.2/level.
        let low = daily_wage(ProfessionKind::Innkeeper, 1).ok().flatten();
        let high = daily_wage(ProfessionKind::Innkeeper, 50).ok().flatten();
        assert_eq!(low, Some(Decimal::new(32, 1)));
        assert_eq!(high, Some(Decimal::from(13u32)));
        assert!(high > low);
    }

    #[test]
    fn healers_out_earn_innkeepers_at_equal_level() {
        let healer = daily_wage(ProfessionKind::Healer, 10).ok().flatten();
        let innkeeper = daily_wage(ProfessionKind::Innkeeper, 10).ok().flatten();
        assert!(healer > innkeeper);
    }
}
