//! Error types for the data layer.

use daybreak_types::CharacterId;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value could not be decoded into its domain type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The character is too weak to act and may only submit REST.
    #[error("character {character} is incapacitated and may only rest")]
    Incapacitated {
        /// The rejected submitter.
        character: CharacterId,
    },

    /// A money or XP computation failed while persisting.
    #[error(transparent)]
    Rules(#[from] daybreak_rules::RulesError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
