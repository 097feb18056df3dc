//! Pure game math for the Daybreak tick engine.
//!
//! Everything in this crate is deterministic given its inputs (the roll
//! engine takes its RNG as a parameter). No I/O, no storage, no clock.
//!
//! # Modules
//!
//! - [`roll`] -- the randomized roll engine: gather yield and craft
//!   quality, the single source of truth for resolution randomness
//! - [`bonus`] -- static racial/profession modifier tables and
//!   conditional penalties
//! - [`hunger`] -- satiety thresholds, the soul-fade remap, work gates
//! - [`progression`] -- the six-tier ladder and XP roll-forward
//! - [`recipes`] -- the static recipe book

pub mod bonus;
pub mod error;
pub mod hunger;
pub mod progression;
pub mod recipes;
pub mod roll;

pub use bonus::{RacialModifiers, conditional_penalty, racial_modifiers};
pub use error::RulesError;
pub use hunger::{blocks_work, hunger_for, may_submit, work_multiplier_pct};
pub use progression::{Progress, apply_xp, proficiency_bonus, tier_for_level};
pub use recipes::RecipeBook;
pub use roll::{QualityRoll, craft_quality, gather_yield, tier_for_total};
