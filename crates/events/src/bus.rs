//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PipelineEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use novela_core::types::EntityId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PipelineEvent
// ---------------------------------------------------------------------------

/// A state change (or recovery action) on a pipeline entity.
///
/// Constructed via [`PipelineEvent::state_changed`] and enriched with
/// [`with_project`](PipelineEvent::with_project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// Dot-separated event name, e.g. `"entity.state_changed"`.
    pub event_type: String,

    /// Snapshot key of the entity type, e.g. `"generated_images"`.
    pub entity_type: String,

    /// The affected entity's id.
    pub entity_id: EntityId,

    /// Owning project, when the publisher knows it.
    pub project_id: Option<EntityId>,

    /// The action that caused the change, e.g. `"approve"`.
    pub action: String,

    /// State before the change.
    pub from_state: String,

    /// State after the change.
    pub to_state: String,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PipelineEvent {
    /// Create a state-change event.
    pub fn state_changed(
        entity_type: &str,
        entity_id: EntityId,
        action: &str,
        from_state: &str,
        to_state: &str,
    ) -> Self {
        Self {
            event_type: "entity.state_changed".to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            project_id: None,
            action: action.to_string(),
            from_state: from_state.to_string(),
            to_state: to_state.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Attach the owning project to the event.
    pub fn with_project(mut self, project_id: EntityId) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`PipelineEvent`].
pub struct EventBus {
    sender: broadcast::Sender<PipelineEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: PipelineEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let id = EntityId::new_v4();
        bus.publish(
            PipelineEvent::state_changed("episodes", id, "approve", "generated", "approved")
                .with_project(EntityId::new_v4()),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "entity.state_changed");
        assert_eq!(event.entity_id, id);
        assert_eq!(event.to_state, "approved");
        assert!(event.project_id.is_some());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(PipelineEvent::state_changed(
            "ideas",
            EntityId::new_v4(),
            "reject",
            "draft",
            "rejected",
        ));
    }

    #[tokio::test]
    async fn each_subscriber_gets_every_event() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PipelineEvent::state_changed(
            "thumbnails",
            EntityId::new_v4(),
            "reset",
            "generating",
            "pending",
        ));

        assert_eq!(rx1.recv().await.unwrap().action, "reset");
        assert_eq!(rx2.recv().await.unwrap().action, "reset");
    }
}
