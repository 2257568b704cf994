//! Change notifications for bound views
//!
//! A family publishes every structural change on a broadcast channel. Views
//! subscribe and replay the changes to stay in sync; nothing here depends on
//! a particular UI binding technology.

use crate::model::WordId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of undelivered events a slow subscriber may fall behind by.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Largest channel capacity a family will allocate.
pub const MAX_EVENT_CAPACITY: usize = 65_536;

/// Receiving half of a family's change stream.
pub type FamilyReceiver = broadcast::Receiver<FamilyEvent>;

/// A structural change to a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FamilyChange {
    /// `word` was appended at `index`.
    Added { word: WordId, index: usize },
    /// `word` was removed from `index`.
    Removed { word: WordId, index: usize },
    Renamed { name: String },
    /// A successful sort produced a different order.
    Reordered { order: Vec<WordId> },
}

/// A change stamped with its position in the family's event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyEvent {
    /// Monotonically increasing, starting at 1.
    pub sequence: u64,
    pub change: FamilyChange,
}

/// Sending half of a family's change stream.
pub struct EventChannel {
    sender: broadcast::Sender<FamilyEvent>,
    sequence: u64,
}

impl EventChannel {
    /// `capacity` is clamped to `1..=MAX_EVENT_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.clamp(1, MAX_EVENT_CAPACITY));
        EventChannel {
            sender,
            sequence: 0,
        }
    }

    pub fn subscribe(&self) -> FamilyReceiver {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Stamp and publish a change. Never blocks; having no subscribers is fine.
    pub fn emit(&mut self, change: FamilyChange) -> u64 {
        self.sequence += 1;
        let event = FamilyEvent {
            sequence: self.sequence,
            change,
        };
        if self.sender.send(event).is_err() {
            trace!(sequence = self.sequence, "no subscribers for family event");
        }
        self.sequence
    }

    /// Sequence number of the last emitted event.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("sequence", &self.sequence)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}
