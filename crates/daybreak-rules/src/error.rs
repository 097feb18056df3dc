//! Error types for the rules crate.

/// Errors that can occur in pure rules computations.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// An arithmetic overflow occurred during a rules computation.
    #[error("arithmetic overflow in rules computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
