//! Async combat driver
//!
//! Owns a combat session and feeds it from two sources:
//! - physical keys from an mpsc channel, translated through the keymap
//! - a periodic tick that lets pending delays expire
//!
//! Both go through the one `select!` loop, so the session never sees two
//! events at once.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::combat::CombatSession;
use crate::ui::{GameMessage, Key, Keymap, ScreenBuffer};

/// Runs one combat to completion
pub struct CombatDriver {
    session: CombatSession,
    keymap: Keymap,
    screen: ScreenBuffer,
    tick: Duration,
}

impl CombatDriver {
    /// `keymap` and `screen` must be the handles the session was built with
    pub fn new(session: CombatSession, keymap: Keymap, screen: ScreenBuffer, tick: Duration) -> Self {
        Self {
            session,
            keymap,
            screen,
            tick: tick.max(Duration::from_millis(1)),
        }
    }

    /// Start the combat and pump events until it closes or input ends.
    ///
    /// `present` is called whenever the screen changed.
    pub async fn run<F>(mut self, mut keys: mpsc::Receiver<Key>, mut present: F) -> CombatSession
    where
        F: FnMut(&ScreenBuffer),
    {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.session.msg_game(GameMessage::Combat);
        let mut shown = self.screen.generation();
        present(&self.screen);

        while self.session.is_open() {
            tokio::select! {
                key = keys.recv() => {
                    match key {
                        Some(key) => {
                            let event = self.keymap.translate(key);
                            debug!("input {:?} -> {:?}", key, event);
                            self.session.handle_input(event);
                        }
                        None => {
                            info!("input closed, leaving combat");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.session.tick();
                }
            }

            let generation = self.screen.generation();
            if generation != shown {
                shown = generation;
                present(&self.screen);
            }
        }

        self.session
    }
}
