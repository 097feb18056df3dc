//! Error types for world-state transitions.

use thiserror::Error;

/// Errors a world-state transition can produce.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A money or counter computation overflowed.
    #[error("arithmetic overflow in {context}")]
    ArithmeticOverflow {
        /// What was being computed.
        context: String,
    },
}
