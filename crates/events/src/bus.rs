//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the facade and any
//! view that needs to refresh after a write.

use booklog_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// LibraryEvent
// ---------------------------------------------------------------------------

/// The kind of record an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Board,
    Status,
    Book,
    Tag,
    Comment,
}

/// A committed change to the library.
///
/// `containers` names the parents whose child lists changed: the board
/// list, a board (its statuses), a status (its books) or a book (its
/// comments and tags). A view showing one of them re-fetches it; a move
/// across containers lists both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEvent {
    /// Dot-separated event name, e.g. `"book.moved"`.
    pub event_type: String,

    pub entity: EntityKind,

    pub entity_id: DbId,

    pub containers: Vec<DbId>,

    pub timestamp: Timestamp,
}

impl LibraryEvent {
    pub fn new(event_type: impl Into<String>, entity: EntityKind, entity_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            entity,
            entity_id,
            containers: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Add affected containers, skipping ones already listed.
    pub fn with_containers(mut self, containers: impl IntoIterator<Item = DbId>) -> Self {
        for container in containers {
            if !self.containers.contains(&container) {
                self.containers.push(container);
            }
        }
        self
    }

    /// Whether a view showing `container` must re-fetch it.
    pub fn touches(&self, container: DbId) -> bool {
        self.containers.contains(&container)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out bus: every subscriber independently receives every event
/// published after it subscribed.
pub struct EventBus {
    sender: broadcast::Sender<LibraryEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped silently when
    /// nobody is listening.
    pub fn publish(&self, event: LibraryEvent) {
        tracing::trace!(event_type = %event.event_type, "Publishing event");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
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
