//! Shared type definitions for the Daybreak tick engine.
//!
//! This crate is the single source of truth for all types used across the
//! Daybreak workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the player-facing front-end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (actions, races, professions, quality,
//!   governance phases)
//! - [`structs`] -- Core entity structs (characters, towns, buildings,
//!   elections, recipes)
//! - [`actions`] -- The daily action row and its parameter bags
//! - [`results`] -- Per-tick result accumulation, daily reports, tick summary
//! - [`events`] -- Domain events published over the notification channel

pub mod actions;
pub mod enums;
pub mod events;
pub mod ids;
pub mod results;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionParams, CombatBehavior, CombatStance, DailyAction};
pub use enums::{
    ActionStatus, ActionType, Biome, BuildingKind, ElectionPhase, HungerState, ImpeachmentStatus,
    ItemKind, LawStatus, ProfessionCategory, ProfessionKind, ProfessionTier, QualityTier, Race,
    SoulFadeStage, ToolKind,
};
pub use events::GameEvent;
pub use ids::{
    ActionId, BuildingId, CaravanId, CharacterId, ElectionId, ImpeachmentId, KingdomId, LawId,
    LoanId, StackId, TownId,
};
pub use results::{ActionOutcome, CharacterResults, DailyReport, FoodOutcome, TickSummary};
pub use structs::{
    Building, Candidate, Caravan, Character, Election, EquippedTool, Impeachment, InventoryStack,
    Kingdom, Law, Loan, PlayerProfession, Recipe, Seat, Town, TownResource,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::CharacterId::export_all();
        let _ = crate::ids::TownId::export_all();
        let _ = crate::ids::KingdomId::export_all();
        let _ = crate::ids::ActionId::export_all();
        let _ = crate::ids::BuildingId::export_all();
        let _ = crate::ids::ElectionId::export_all();
        let _ = crate::ids::LawId::export_all();
        let _ = crate::ids::ImpeachmentId::export_all();
        let _ = crate::ids::StackId::export_all();
        let _ = crate::ids::CaravanId::export_all();
        let _ = crate::ids::LoanId::export_all();

        // Enums
        let _ = crate::enums::ActionType::export_all();
        let _ = crate::enums::ActionStatus::export_all();
        let _ = crate::enums::HungerState::export_all();
        let _ = crate::enums::SoulFadeStage::export_all();
        let _ = crate::enums::Race::export_all();
        let _ = crate::enums::ProfessionKind::export_all();
        let _ = crate::enums::ProfessionCategory::export_all();
        let _ = crate::enums::ProfessionTier::export_all();
        let _ = crate::enums::QualityTier::export_all();
        let _ = crate::enums::ItemKind::export_all();
        let _ = crate::enums::ToolKind::export_all();
        let _ = crate::enums::Biome::export_all();
        let _ = crate::enums::BuildingKind::export_all();
        let _ = crate::enums::ElectionPhase::export_all();
        let _ = crate::enums::LawStatus::export_all();
        let _ = crate::enums::ImpeachmentStatus::export_all();

        // Structs
        let _ = crate::structs::Character::export_all();
        let _ = crate::structs::PlayerProfession::export_all();
        let _ = crate::structs::InventoryStack::export_all();
        let _ = crate::structs::EquippedTool::export_all();
        let _ = crate::structs::Loan::export_all();
        let _ = crate::structs::Town::export_all();
        let _ = crate::structs::Kingdom::export_all();
        let _ = crate::structs::TownResource::export_all();
        let _ = crate::structs::Building::export_all();
        let _ = crate::structs::Caravan::export_all();
        let _ = crate::structs::Seat::export_all();
        let _ = crate::structs::Election::export_all();
        let _ = crate::structs::Candidate::export_all();
        let _ = crate::structs::Law::export_all();
        let _ = crate::structs::Impeachment::export_all();
        let _ = crate::structs::Recipe::export_all();

        // Actions
        let _ = crate::actions::ActionParams::export_all();
        let _ = crate::actions::CombatStance::export_all();
        let _ = crate::actions::CombatBehavior::export_all();
        let _ = crate::actions::DailyAction::export_all();

        // Results
        let _ = crate::results::FoodOutcome::export_all();
        let _ = crate::results::ActionOutcome::export_all();
        let _ = crate::results::CharacterResults::export_all();
        let _ = crate::results::DailyReport::export_all();
        let _ = crate::results::TickSummary::export_all();

        // Events
        let _ = crate::events::GameEvent::export_all();
    }
}
