//! Collaborator interfaces used by the combat view
//!
//! - Text canvas (position-addressed screen output)
//! - String table (localized text with positional formatting)
//! - Input bindings (key layouts per screen context)
//! - Event bus (messages to the surrounding game loop)
//! - Audio cues

mod audio;
mod canvas;
mod events;
mod input;
pub mod strings;

pub use audio::{AudioCue, Sound, SoundLog};
pub use canvas::{Cell, ScreenBuffer, TextCanvas, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use events::{EventBus, EventLog, GameEvent, GameMessage, ViewRequest};
pub use input::{Action, InputBindings, InputEvent, Key, KeybindingMode, Keymap};
pub use strings::{Arg, StringTable, Strings};
