//! Data layer for the Daybreak tick engine (`PostgreSQL`).
//!
//! All world state lives in `PostgreSQL`. The tick engine reads state in
//! keyset-paginated batches, resolves actions in memory, and applies
//! effects through the store types in this crate. Mutations that must be
//! atomic (crafting consumption, tax settlement, XP awards) run inside a
//! single transaction; single-column adjustments clamp in SQL so a
//! concurrent writer can never push a gauge out of range.
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`action_store`] -- Daily action submission and resolution queues
//! - [`character_store`] -- Characters, inventory, tools, loans
//! - [`profession_store`] -- Profession progression and the atomic XP award
//! - [`world_store`] -- Towns, kingdoms, resources, buildings, caravans
//! - [`governance_store`] -- Elections, laws, impeachments
//! - [`report_store`] -- Daily reports and tick summaries
//! - [`pagination`] -- Keyset pagination over UUID-v7 primary keys
//! - [`codec`] -- Enum-to-TEXT conversions shared by the stores
//! - [`error`] -- Shared error types

pub mod action_store;
pub mod character_store;
pub mod codec;
pub mod error;
pub mod governance_store;
pub mod pagination;
pub mod postgres;
pub mod profession_store;
pub mod report_store;
pub mod world_store;

// Re-export primary types for convenience.
pub use action_store::ActionStore;
pub use character_store::{CharacterStore, GatherSettlement};
pub use error::DbError;
pub use governance_store::GovernanceStore;
pub use pagination::{DEFAULT_PAGE_SIZE, Page};
pub use postgres::{PostgresConfig, PostgresPool};
pub use profession_store::ProfessionStore;
pub use report_store::ReportStore;
pub use world_store::WorldStore;
