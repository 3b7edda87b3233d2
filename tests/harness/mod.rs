//! Combat test harness
//!
//! Builds a `CombatSession` wired to recording collaborators:
//! - `ScreenBuffer` for the 40x25 text canvas
//! - `Keymap` so keys are translated the way the driver does it
//! - `EventLog` and `SoundLog` to inspect what the view sent out
//!
//! The RNG is seeded and the handicap die has one side, so every round is
//! even and turn order depends only on speed.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut h = CombatHarness::new(party, encounter);
//! h.start();
//! assert!(h.advance_until(Mode::SelectOption));
//! h.press('f');
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use skirmish::combat::{Collaborators, CombatSession, Encounter, Mode};
use skirmish::config::{CombatRules, Config};
use skirmish::party::{Character, CharacterClass, Party};
use skirmish::ui::{EventLog, Key, Keymap, ScreenBuffer, SoundLog, Strings};

/// Reveal steps to try before giving up
const MAX_STEPS: usize = 500;

pub struct CombatHarness {
    pub session: CombatSession,
    pub screen: ScreenBuffer,
    pub keymap: Keymap,
    pub events: EventLog,
    pub sounds: SoundLog,
}

impl CombatHarness {
    /// Harness with the test rules
    pub fn new(party: Party, encounter: Encounter) -> Self {
        Self::with_config(test_config(), party, encounter)
    }

    pub fn with_config(config: Config, party: Party, encounter: Encounter) -> Self {
        let screen = ScreenBuffer::new();
        let keymap = Keymap::new();
        let events = EventLog::new();
        let sounds = SoundLog::new();
        let io = Collaborators {
            canvas: Box::new(screen.clone()),
            audio: Box::new(sounds.clone()),
            strings: Arc::new(Strings::english()),
            bindings: Arc::new(keymap.clone()),
            events: Box::new(events.clone()),
        };
        let session =
            CombatSession::new(&config, io, party, encounter).expect("failed to create session");

        Self {
            session,
            screen,
            keymap,
            events,
            sounds,
        }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    /// Press a character key, translated through the active layout
    pub fn press(&mut self, ch: char) -> bool {
        self.key(Key::Char(ch))
    }

    pub fn escape(&mut self) -> bool {
        self.key(Key::Escape)
    }

    pub fn key(&mut self, key: Key) -> bool {
        let event = self.keymap.translate(key);
        self.session.handle_input(event)
    }

    /// Cut the pending reveal short
    pub fn skip(&mut self) -> bool {
        self.session.end_delay()
    }

    /// Skip reveals until the session is in `mode`. False if the combat
    /// closed or stalled first.
    pub fn advance_until(&mut self, mode: Mode) -> bool {
        self.advance_while(|s| s.mode() != mode)
    }

    /// Like `advance_until`, calling `each` before every step
    pub fn advance_checked(
        &mut self,
        mode: Mode,
        mut each: impl FnMut(&CombatSession, &Keymap),
    ) -> bool {
        for _ in 0..MAX_STEPS {
            each(&self.session, &self.keymap);
            if !self.session.is_open() {
                return false;
            }
            if self.session.mode() == mode {
                return true;
            }
            if !self.session.end_delay() {
                return false;
            }
        }
        false
    }

    fn advance_while(&mut self, pending: impl Fn(&CombatSession) -> bool) -> bool {
        for _ in 0..MAX_STEPS {
            if !self.session.is_open() {
                return false;
            }
            if !pending(&self.session) {
                return true;
            }
            if !self.session.end_delay() {
                return false;
            }
        }
        false
    }

    /// Play the fight out until the session closes or reaches `stop`.
    /// Characters in reach strike the lead monster, the rest block.
    pub fn fight_until(&mut self, stop: Mode) -> bool {
        for _ in 0..MAX_STEPS {
            if !self.session.is_open() {
                return false;
            }
            match self.session.mode() {
                m if m == stop => return true,
                Mode::SelectOption => {
                    let key = if self.session.allowed().attack { 'a' } else { 'b' };
                    self.press(key);
                }
                _ => {
                    if !self.session.end_delay() {
                        return false;
                    }
                }
            }
        }
        false
    }
}

/// Seeded rules with an always-even handicap
pub fn test_config() -> Config {
    Config {
        seed: Some(7),
        rules: CombatRules {
            handicap_die: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A sturdy front-line fighter
pub fn knight(name: &str) -> Character {
    Character::new(name, CharacterClass::Knight)
        .with_hp(1000)
        .with_level(10)
}

pub fn party_of(members: Vec<Character>) -> Party {
    Party::new(members)
}
