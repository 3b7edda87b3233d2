//! Game event bus
//!
//! Messages exchanged between the combat view and the surrounding game loop.

use std::sync::Arc;

use parking_lot::Mutex;

/// Views the combat screen may ask the game to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    Protect,
    QuickRef,
    /// Use an item; the item view answers with a `SpellResult`
    Use,
    /// Character sheet for a combat order position
    CharacterView(usize),
}

/// A game message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameMessage {
    /// Start a combat with the configured encounter
    Combat,
    /// Show a result line at column `x` after an external action
    SpellResult { x: u16, text: String },
    /// Forbid any further attacks this turn
    DisableAttacks,
    /// Combat finished; the game should refresh
    Update,
    /// Every party member is down
    PartyDefeated,
    /// The party ran away
    Retreated,
    /// Open another view on top of combat
    OpenView(ViewRequest),
}

/// A message addressed to a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    pub topic: String,
    pub message: GameMessage,
}

/// Fire-and-forget message delivery
pub trait EventBus: Send {
    fn send(&self, topic: &str, message: GameMessage);
}

/// Event bus that queues messages for later delivery
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all queued events
    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Copy of the queued events
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    /// Whether a message was sent to `topic`
    pub fn contains(&self, topic: &str, message: &GameMessage) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.topic == topic && &e.message == message)
    }

    /// Get count of pending events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if log is empty
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventBus for EventLog {
    fn send(&self, topic: &str, message: GameMessage) {
        self.events.lock().push(GameEvent {
            topic: topic.to_string(),
            message,
        });
    }
}
