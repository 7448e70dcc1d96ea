//! Topic-based event bus implementation.

use std::sync::Arc;

use strum::EnumCount;
use tokio::sync::broadcast;

use super::types::WorldEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, strum::EnumCount)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topic {
    /// Room occupants, projectiles, overlays, room metadata and effects
    Room,
    /// Inventory and spell lists
    Inventory,
    /// Stats and avatar buffs
    Avatar,
    /// Online players, chat and guild data
    Social,
    /// Trade, buy and look windows
    Session,
    /// Engine-level flags (target, avatar, clock, ...)
    Controller,
    /// Raw message log and absorbed anomalies
    Diagnostics,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Receivers are `Send`, so a presentation layer can
/// move them onto its own thread.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<WorldEvent>; Topic::COUNT]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(std::array::from_fn(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: WorldEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<WorldEvent> {
        self.sender(topic).subscribe()
    }

    pub fn receiver_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<WorldEvent> {
        &self.channels[topic as usize]
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ControllerFields;

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut controller = bus.subscribe(Topic::Controller);
        let mut room = bus.subscribe(Topic::Room);

        bus.publish(WorldEvent::Controller(ControllerFields::TARGET));

        assert!(matches!(
            controller.try_recv(),
            Ok(WorldEvent::Controller(fields)) if fields == ControllerFields::TARGET
        ));
        assert!(room.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(WorldEvent::ChatCleared);
        assert_eq!(bus.receiver_count(Topic::Social), 0);
    }
}
