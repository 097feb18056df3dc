//! Error types for tick orchestration.

use daybreak_types::CharacterId;

/// Errors that can occur during tick execution.
///
/// Step wrappers catch these, log them, and continue the pipeline;
/// only the re-entrancy guard surfaces an error to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A storage operation failed.
    #[error("database error: {source}")]
    Db {
        /// The underlying data-layer error.
        #[from]
        source: daybreak_db::DbError,
    },

    /// A resolver computation failed.
    #[error("resolver error for {character}: {source}")]
    Resolver {
        /// The character whose action faulted.
        character: CharacterId,
        /// The underlying resolver error.
        source: daybreak_resolvers::ResolverError,
    },

    /// A world-state transition failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: daybreak_world::WorldError,
    },

    /// A tick for this world is already running.
    #[error("a tick is already in progress; overlapping runs are refused")]
    AlreadyRunning,
}
