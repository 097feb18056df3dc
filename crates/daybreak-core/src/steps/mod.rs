//! The tick pipeline steps, in resolution order.
//!
//! Every step takes the shared [`TickContext`](crate::context::TickContext)
//! and returns a step-level result; the orchestrator logs failures and
//! keeps going, so one broken step never silently takes the rest of the
//! night down with it.

pub mod delivery;
pub mod economy;
pub mod elections;
pub mod encounters;
pub mod food;
pub mod governance;
pub mod quests;
pub mod rest;
pub mod service;
pub mod travel;
pub mod upkeep;
pub mod work;
pub mod world_events;
