//! Per-action-family sub-resolvers for the Daybreak tick engine.
//!
//! Each resolver is a pure function from a context snapshot to an
//! effects value plus player-facing notifications; the orchestrator
//! snapshots the context, calls the resolver, then applies the effects
//! through `daybreak-db`. No resolver rolls dice directly: randomness
//! flows through the injected RNG into `daybreak_rules::roll`.

pub mod craft;
pub mod error;
pub mod gather;
pub mod rest;
pub mod service;
pub mod tool;

pub use craft::{CraftContext, CraftEffects, CraftResolution, StackDraw, resolve_craft};
pub use error::ResolverError;
pub use gather::{GatherContext, GatherEffects, GatherResolution, gathering_profession, resolve_gather};
pub use rest::{RestEffects, resolve_rest};
pub use service::daily_wage;
pub use tool::ToolWear;
