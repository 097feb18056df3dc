//! World-state transition functions for the Daybreak tick engine.
//!
//! Pure decisions over world aggregates: no storage, no randomness. The
//! economy and governance steps compute a decision here, then apply it
//! through `daybreak-db`.
//!
//! # Modules
//!
//! - [`abundance`] -- town resource depletion and regeneration
//! - [`building`] -- structural decay, property tax, delinquency, seizure
//! - [`election`] -- the election phase machine and vote tally
//! - [`law`] -- law and impeachment deadline resolution

pub mod abundance;
pub mod building;
pub mod election;
pub mod error;
pub mod law;

pub use building::TaxDecision;
pub use error::WorldError;
