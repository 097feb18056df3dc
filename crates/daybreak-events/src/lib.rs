//! NATS event publishing for the Daybreak tick engine.
//!
//! Domain events go out on subjects of the form
//! `daybreak.events.<kind>`, where `<kind>` is the event's stable
//! snake-case tag. Delivery is best-effort by design: a broken or
//! absent broker is logged and ignored, because notification loss must
//! never abort a tick step.

use daybreak_types::GameEvent;
use tracing::{debug, info, warn};

/// Subject prefix for all tick-engine events.
const SUBJECT_PREFIX: &str = "daybreak.events";

/// Errors raised while establishing the event channel.
///
/// Publishing itself never errors; see [`EventPublisher::publish`].
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The NATS connection could not be established.
    #[error("NATS connection failed: {0}")]
    Connect(String),
}

/// Best-effort publisher of [`GameEvent`]s over NATS.
///
/// Constructed once at startup and shared by the tick pipeline. The
/// `disabled` constructor yields a publisher that drops everything,
/// used in tests and when no broker is configured.
#[derive(Clone)]
pub struct EventPublisher {
    client: Option<async_nats::Client>,
}

impl EventPublisher {
    /// Connect to a NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Connect`] if the connection cannot be
    /// established.
    pub async fn connect(url: &str) -> Result<Self, EventError> {
        info!(url = url, "connecting to NATS server");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| EventError::Connect(format!("failed to connect to {url}: {e}")))?;
        info!("NATS connection established");
        Ok(Self {
            client: Some(client),
        })
    }

    /// A publisher that silently drops every event.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { client: None }
    }

    /// Whether events actually leave the process.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Publish one event on `daybreak.events.<kind>` (fire-and-forget).
    ///
    /// Serialization and publish failures are logged but do not
    /// propagate -- event delivery must never block or fail the tick.
    pub async fn publish(&self, event: &GameEvent) {
        let Some(client) = self.client.as_ref() else {
            return;
        };
        let subject = format!("{SUBJECT_PREFIX}.{}", event.kind());
        match serde_json::to_vec(event) {
            Ok(payload) => {
                if let Err(e) = client.publish(subject.clone(), payload.into()).await {
                    warn!(subject = subject, error = %e, "failed to publish event");
                } else {
                    debug!(subject = subject, "published event");
                }
            }
            Err(e) => {
                warn!(subject = subject, error = %e, "failed to serialize event");
            }
        }
    }

    /// Publish a batch of events in order.
    pub async fn publish_all(&self, events: &[GameEvent]) {
        for event in events {
            self.publish(event).await;
        }
    }

    /// Flush pending messages to the server, if connected.
    pub async fn flush(&self) {
        if let Some(client) = self.client.as_ref() {
            if let Err(e) = client.flush().await {
                warn!(error = %e, "failed to flush event channel");
            }
        }
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use daybreak_types::CharacterId;

    use super::*;

    #[tokio::test]
    async fn disabled_publisher_drops_events() {
        let publisher = EventPublisher::disabled();
        assert!(!publisher.is_enabled());
        // Must be a no-op, not a panic or an error.
        publisher
            .publish(&GameEvent::ToolBroken {
                character_id: CharacterId::new(),
            })
            .await;
        publisher.flush().await;
    }

    // Integration tests that require a live NATS server are marked #[ignore].
    #[tokio::test]
    #[ignore = "requires live NATS server (docker compose up -d)"]
    async fn connect_and_publish() {
        let publisher = EventPublisher::connect("nats://localhost:4222")
            .await
            .unwrap_or_else(|e| {
                tracing::error!("NATS connection failed: {e}");
                std::process::exit(1);
            });
        assert!(publisher.is_enabled());
        publisher
            .publish(&GameEvent::TickComplete {
                day: chrono::NaiveDate::default(),
                characters_processed: 0,
            })
            .await;
        publisher.flush().await;
    }
}
