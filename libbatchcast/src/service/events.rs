//! Event system for progress tracking
//!
//! In-process event bus built on `tokio::sync::broadcast`. Services emit
//! events during imports and batch operations; any number of subscribers
//! (CLI progress output, tests) can listen. Emitting with no subscribers
//! drops the event without blocking.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus for service events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Send to all subscribers; never blocks or fails
    pub fn emit(&self, event: Event) {
        // send() only fails when nobody is subscribed, which is fine
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events emitted by the batch service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch of files is about to be imported
    ImportStarted { files: Vec<String> },

    /// One file imported successfully
    ImportFileCompleted { file: String, drafts: usize },

    /// One file could not be imported
    ImportFileFailed { file: String, error: String },

    /// A time slot was applied to a set of drafts
    SlotApplied { slot_id: String, updated: usize },

    /// Ready drafts were promoted to scheduled
    DraftsScheduled { post_ids: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_emission_and_subscription() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();

        event_bus.emit(Event::ImportFileCompleted {
            file: "posts.csv".to_string(),
            drafts: 3,
        });

        match receiver.recv().await.unwrap() {
            Event::ImportFileCompleted { file, drafts } => {
                assert_eq!(file, "posts.csv");
                assert_eq!(drafts, 3);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new(10);
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();

        let event = Event::SlotApplied {
            slot_id: "morning-boost".to_string(),
            updated: 2,
        };
        event_bus.emit(event.clone());

        assert_eq!(receiver1.recv().await.unwrap(), event);
        assert_eq!(receiver2.recv().await.unwrap(), event);
    }

    #[test]
    fn test_no_subscribers() {
        let event_bus = EventBus::new(10);
        event_bus.emit(Event::DraftsScheduled { post_ids: vec![] });
        assert_eq!(event_bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::ImportFileFailed {
            file: "notes.pdf".to_string(),
            error: "Unsupported file type: .pdf".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"import_file_failed\""));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
