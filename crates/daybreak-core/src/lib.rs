//! The Daybreak tick orchestrator.
//!
//! One call to [`run_tick`] resolves one game day: every character's
//! committed action, hunger, passive income, governance deadlines, the
//! town economy, and the upkeep sweeps, in a fixed step order with
//! per-step and per-item error isolation. The output is one daily
//! report per character plus an operational [`TickSummary`]
//! (re-exported from `daybreak-types` via the return type).
//!
//! [`TickSummary`]: daybreak_types::TickSummary

pub mod config;
pub mod context;
pub mod error;
pub mod rng;
pub mod steps;
pub mod tick;

pub use config::TickConfig;
pub use context::TickContext;
pub use error::TickError;
pub use rng::character_rng;
pub use tick::run_tick;
