//! Shared application state for the trigger server.
//!
//! [`AppState`] holds the connection pool, the event publisher, and
//! the tick tuning. It is wrapped in [`Arc`](std::sync::Arc) and
//! injected via Axum's `State` extractor.

use daybreak_core::TickConfig;
use daybreak_db::PostgresPool;
use daybreak_events::EventPublisher;
use tokio::sync::Mutex;

/// Shared state for the Axum application.
pub struct AppState {
    /// `PostgreSQL` connection pool.
    pub pool: PostgresPool,
    /// Event publisher for tick outputs.
    pub publisher: EventPublisher,
    /// Tick pipeline tuning.
    pub tick: TickConfig,
    /// Re-entrancy guard. Held for the duration of a tick so a second
    /// trigger arriving mid-run is refused instead of interleaved.
    pub tick_guard: Mutex<()>,
}

impl AppState {
    /// Create the application state.
    pub const fn new(pool: PostgresPool, publisher: EventPublisher, tick: TickConfig) -> Self {
        Self {
            pool,
            publisher,
            tick,
            tick_guard: Mutex::const_new(()),
        }
    }
}
