//! Error types for action resolution.
//!
//! Player-facing failures (missing ingredients, exhausted nodes) are not
//! errors: resolvers report them as blocked outcomes with a notification.
//! These errors are engine faults the orchestrator isolates per item.

use daybreak_rules::RulesError;
use thiserror::Error;

/// Errors a sub-resolver can produce.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// A game-math computation failed.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A money or quantity computation overflowed.
    #[error("arithmetic overflow in {context}")]
    ArithmeticOverflow {
        /// What was being computed.
        context: String,
    },
}
