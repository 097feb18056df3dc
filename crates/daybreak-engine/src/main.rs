//! Engine binary for the Daybreak world.
//!
//! This is the long-running process that owns the database pool, the
//! event publisher, and the manual tick trigger. The nightly scheduler
//! (cron or an operator) calls `POST /tick/run` to resolve one game
//! day.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `daybreak-config.yaml`
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Connect the event publisher (NATS, optional)
//! 5. Serve the trigger HTTP server until terminated

mod config;
mod error;
mod state;
mod trigger;

use std::path::Path;
use std::sync::Arc;

use daybreak_db::{PostgresConfig, PostgresPool};
use daybreak_events::EventPublisher;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::state::AppState;

/// Application entry point for the Daybreak engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the trigger server
/// itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("daybreak-engine starting");

    // 2. Load configuration.
    let config_path = Path::new("daybreak-config.yaml");
    if !config_path.exists() {
        info!("Config file not found, using defaults");
    }
    let config = EngineConfig::load(config_path)?;
    info!(
        trigger_port = config.trigger.port,
        page_size = config.tick.page_size,
        batch_size = config.tick.batch_size,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL and run migrations.
    let pg_config = PostgresConfig::new(&config.database.url)
        .with_max_connections(config.database.max_connections);
    let pool = PostgresPool::connect(&pg_config).await?;
    pool.run_migrations().await?;

    // 4. Connect the event publisher. A NATS outage must not stop the
    //    tick, so a failed connection degrades to a disabled publisher.
    let publisher = if config.nats.enabled {
        match EventPublisher::connect(&config.nats.url).await {
            Ok(publisher) => publisher,
            Err(e) => {
                warn!(error = %e, "NATS unavailable, events disabled for this run");
                EventPublisher::disabled()
            }
        }
    } else {
        info!("Event publishing disabled by configuration");
        EventPublisher::disabled()
    };

    // 5. Serve the trigger until terminated.
    let state = Arc::new(AppState::new(pool, publisher, config.tick_config()));
    trigger::start_server(&config.trigger, state).await?;

    Ok(())
}
