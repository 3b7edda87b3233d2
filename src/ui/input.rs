//! Input events and keybinding contexts
//!
//! Physical keys are translated into either a raw keypress or a logical
//! action, depending on the active keybinding mode:
//! - Menus: only Escape is an action, everything else is a keypress
//! - Combat: option letters and party digits are actions
//! - PartyMenus: party digits are actions

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// A physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
}

impl Key {
    /// Parse a line of typed input into keys. The words `esc` and `enter`
    /// stand for those keys; any other text is taken character by character.
    pub fn parse_line(line: &str) -> Vec<Key> {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "esc" | "escape" => vec![Key::Escape],
            "enter" | "" => vec![Key::Enter],
            _ => trimmed
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| Key::Char(c.to_ascii_lowercase()))
                .collect(),
        }
    }

    /// Index of a letter key counted from `a`
    pub fn letter_index(&self) -> Option<usize> {
        match self {
            Key::Char(c) if c.is_ascii_alphabetic() => {
                Some(usize::from(c.to_ascii_lowercase() as u8 - b'a'))
            }
            _ => None,
        }
    }

    /// Value of a digit key
    pub fn digit(&self) -> Option<u8> {
        match self {
            Key::Char(c) => c.to_digit(10).map(|d| d as u8),
            _ => None,
        }
    }
}

/// Logical actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Escape,
    /// Party member 1-6, zero based
    ViewParty(u8),
    Attack,
    Block,
    Cast,
    Delay,
    Exchange,
    Fight,
    Protect,
    Quickref,
    Retreat,
    Shoot,
    Use,
}

/// An input event delivered to the combat view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Keypress(Key),
    Action(Action),
}

/// Which key layout is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeybindingMode {
    #[default]
    Menus,
    Combat,
    PartyMenus,
}

/// Settable input binding context
pub trait InputBindings: Send + Sync {
    /// Switch the active key layout
    fn set_mode(&self, mode: KeybindingMode);

    /// The active key layout
    fn mode(&self) -> KeybindingMode;
}

/// Shared keymap. The combat session switches its mode, the input loop
/// translates keys through it.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    mode: Arc<RwLock<KeybindingMode>>,
}

impl Keymap {
    /// Create a keymap in menu mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a physical key under the current mode
    pub fn translate(&self, key: Key) -> InputEvent {
        let mode = *self.mode.read();
        if key == Key::Escape {
            return InputEvent::Action(Action::Escape);
        }
        let Key::Char(ch) = key else {
            return InputEvent::Keypress(key);
        };

        let party_slot = match ch {
            '1'..='6' => Some(ch as u8 - b'1'),
            _ => None,
        };

        match mode {
            KeybindingMode::Menus => InputEvent::Keypress(key),
            KeybindingMode::PartyMenus => match party_slot {
                Some(slot) => InputEvent::Action(Action::ViewParty(slot)),
                None => InputEvent::Keypress(key),
            },
            KeybindingMode::Combat => {
                if let Some(slot) = party_slot {
                    return InputEvent::Action(Action::ViewParty(slot));
                }
                let action = match ch.to_ascii_lowercase() {
                    'a' => Action::Attack,
                    'b' => Action::Block,
                    'c' => Action::Cast,
                    'd' => Action::Delay,
                    'e' => Action::Exchange,
                    'f' => Action::Fight,
                    'p' => Action::Protect,
                    'q' => Action::Quickref,
                    'r' => Action::Retreat,
                    's' => Action::Shoot,
                    'u' => Action::Use,
                    _ => return InputEvent::Keypress(key),
                };
                InputEvent::Action(action)
            }
        }
    }
}

impl InputBindings for Keymap {
    fn set_mode(&self, mode: KeybindingMode) {
        let mut current = self.mode.write();
        if *current != mode {
            debug!("keybinding mode {:?} -> {:?}", *current, mode);
        }
        *current = mode;
    }

    fn mode(&self) -> KeybindingMode {
        *self.mode.read()
    }
}
